//! Reactive query streams: re-run a SELECT every time the entity's change trigger fires.

use crate::accessor::EntityAccessor;
use crate::service::DaoService;
use crate::sql::SelectOptions;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct StreamOptions {
    pub select: SelectOptions,
    /// Emit right away even if the channel has never published. A channel that has
    /// published always replays a fresh evaluation to a new subscriber.
    pub with_start: bool,
    /// Wait this long after each publish before re-evaluating.
    pub emit_delay: Duration,
    /// Drop a result equal to the previous emission.
    pub with_distinct: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            select: SelectOptions::default(),
            with_start: true,
            emit_delay: Duration::ZERO,
            with_distinct: false,
        }
    }
}

impl StreamOptions {
    pub fn select(select: SelectOptions) -> Self {
        StreamOptions {
            select,
            ..Default::default()
        }
    }

    pub fn with_start(mut self, with_start: bool) -> Self {
        self.with_start = with_start;
        self
    }

    pub fn emit_delay(mut self, delay: Duration) -> Self {
        self.emit_delay = delay;
        self
    }

    pub fn distinct(mut self, with_distinct: bool) -> Self {
        self.with_distinct = with_distinct;
        self
    }
}

/// Lazy and never-ending: nothing runs until first poll, and dropping the stream stops it.
/// Each publish yields one re-evaluation.
pub fn flowable<D: EntityAccessor>(dao: Arc<D>, options: StreamOptions) -> impl Stream<Item = Vec<D::Record>> + Send + 'static {
    async_stream::stream! {
        let table = dao.storage_table();
        let trigger = dao.provider().triggers().channel(&table);
        let updates = trigger.updates();
        futures::pin_mut!(updates);
        let mut last: Option<Vec<D::Record>> = None;

        if options.with_start || trigger.has_published() {
            let rows = DaoService::select(dao.as_ref(), &options.select).await;
            last = Some(rows.clone());
            yield rows;
        }

        while let Some(()) = updates.next().await {
            if !options.emit_delay.is_zero() {
                tokio::time::sleep(options.emit_delay).await;
            }
            let rows = DaoService::select(dao.as_ref(), &options.select).await;
            if options.with_distinct && last.as_ref() == Some(&rows) {
                continue;
            }
            last = Some(rows.clone());
            yield rows;
        }
    }
}

/// [`flowable`] with the provider's default emit delay.
pub fn flowable_with_defaults<D: EntityAccessor>(dao: Arc<D>, select: SelectOptions) -> impl Stream<Item = Vec<D::Record>> + Send + 'static {
    let delay = dao.provider().emit_delay();
    flowable(dao, StreamOptions::select(select).emit_delay(delay))
}
