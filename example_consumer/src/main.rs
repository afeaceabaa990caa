//! Example consumer: opens the runtime store and drives the accessors the build script
//! generated from `declarations.json`. Also regenerates the per-module sources into the
//! configured output directory, for reading.
//!
//! Run from this directory: `cargo run`
//! Settings come from `DAO_SYNTH_*` variables or a `.env` file.

use dao_synth::codegen::GeneratorOptions;
use dao_synth::sql::SelectOptions;
use dao_synth::stream::flowable_with_defaults;
use dao_synth::{generate, init_logging, load_from_path, resolve, DaoService, Provider, Settings};
use example_consumer::generated::{AppDatabaseImpl, ZsMp04DaoModel};
use futures::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("dao_synth=info,example_consumer=info");
    let settings = Settings::from_env();

    let schema = resolve(&load_from_path(&settings.declarations_path)?)?;
    let code = generate(&schema, &GeneratorOptions::from_settings(&settings))?;
    let written = code.write_to_dir(&settings.output_dir)?;
    tracing::info!(files = written.len(), dir = %settings.output_dir.display(), "sources written");

    let provider = Provider::connect(&settings).await?;
    let db = AppDatabaseImpl::instance(provider);
    let dao = db.zs_mp04_dao().await;

    let mut rows = Box::pin(flowable_with_defaults(dao.clone(), SelectOptions::default().order_by("SORDER")));
    let initial = rows.next().await.unwrap_or_default();
    tracing::info!(rows = initial.len(), "initial snapshot");

    let task = ZsMp04DaoModel {
        tid: Some("T-1".into()),
        code: Some("PICK".into()),
        sorder: Some(10),
        text: Some("first task".into()),
        done: Some(false),
    };
    let status = DaoService::insert_or_replace(dao.as_ref(), &task, true).await;
    if !status.ok {
        tracing::warn!(error_code = ?status.error_code, message = ?status.message, "insert failed");
    }
    let updated = rows.next().await.unwrap_or_default();
    tracing::info!(rows = updated.len(), "snapshot after insert");

    let picks = dao.by_code("PICK").await;
    tracing::info!(matches = picks.len(), "tasks with code PICK");
    Ok(())
}
