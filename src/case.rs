//! Naming conventions shared by the schema compiler and the code emitter.

/// Suffix of every generated accessor and facade type.
pub const IMPL_SUFFIX: &str = "Impl";
pub const MODEL_SUFFIX: &str = "Model";
pub const STATUS_SUFFIX: &str = "Status";
pub const PARAMS_SUFFIX: &str = "Params";
pub const RESULT_SUFFIX: &str = "ResultModel";
pub const RESPOND_STATUS_SUFFIX: &str = "RespondStatus";

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "gen",
];

/// `IZsMp04Dao` -> `ZsMp04Dao`. A leading `I` counts as an interface marker only when
/// followed by another uppercase letter, so `Item` is left alone.
pub fn strip_interface_prefix(name: &str) -> &str {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('I'), Some(c)) if c.is_ascii_uppercase() => &name[1..],
        _ => name,
    }
}

pub fn impl_name(declared: &str) -> String {
    format!("{}{}", strip_interface_prefix(declared), IMPL_SUFFIX)
}

pub fn suffixed(declared: &str, suffix: &str) -> String {
    format!("{}{}", strip_interface_prefix(declared), suffix)
}

/// Convert a single identifier from snake_case to PascalCase.
/// e.g. "et_data" -> "EtData", "ET_DATA" -> "EtData"
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let all_caps = !s.chars().any(|c| c.is_lowercase());
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else if all_caps {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a single identifier from camelCase to snake_case.
/// e.g. "zsMp04Dao" -> "zs_mp04_dao", "TASK_NUM" -> "task_num"
pub fn to_snake_case(s: &str) -> String {
    if !s.chars().any(|c| c.is_lowercase()) {
        return s.to_lowercase();
    }
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Snake-case identifier safe to use as a Rust field, parameter or method name.
pub fn rust_ident(raw: &str) -> String {
    let snake = to_snake_case(raw);
    let mut ident: String = snake
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "f_");
    }
    match ident.as_str() {
        "self" | "super" | "crate" | "_" => format!("{}_", ident),
        kw if KEYWORDS.contains(&kw) => format!("r#{}", kw),
        _ => ident,
    }
}

/// Module file stem for a generated type: `ZsMp04DaoImpl` -> `zs_mp04_dao_impl`.
pub fn module_name(type_name: &str) -> String {
    to_snake_case(type_name)
}
