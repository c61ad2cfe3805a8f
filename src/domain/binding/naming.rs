//! Identifier conversion from Solidity names to Rust names

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Convert a camelCase or PascalCase name to snake_case
///
/// Acronyms stay together: `getURI` -> `get_uri`, `SafeERC20` -> `safe_erc20`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (idx, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_uppercase() && idx > 0 {
            let prev = chars[idx - 1];
            let next_lower = chars
                .get(idx + 1)
                .map(|c| c.is_ascii_lowercase())
                .unwrap_or(false);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }

    out
}

/// SCREAMING_SNAKE_CASE for constants
pub fn screaming_snake_case(name: &str) -> String {
    snake_case(name).to_ascii_uppercase()
}

/// Name of the `FunctionDescriptor` static for a Solidity function
pub fn descriptor_name(name: &str) -> String {
    sanitize_ident(&screaming_snake_case(name))
}

/// Module and file stem for a contract type name
pub fn module_name(type_name: &str) -> String {
    sanitize_ident(&snake_case(type_name))
}

/// Make a snake_case string a valid Rust identifier
pub fn sanitize_ident(ident: &str) -> String {
    let mut ident: String = ident
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.is_empty() {
        return "_".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if ident == "_" || is_keyword(&ident) {
        ident.push('_');
    }
    ident
}

/// Whether `ident` is reserved in Rust
pub fn is_keyword(ident: &str) -> bool {
    RUST_KEYWORDS.contains(&ident)
}

/// Rust method name for a Solidity function
pub fn method_name(name: &str) -> String {
    sanitize_ident(&snake_case(name))
}

/// Rust binding name for a parameter or struct field
///
/// Leading underscores are dropped (`_pid` -> `pid`); unnamed parameters
/// fall back to `{fallback}{index}`.
pub fn param_name(name: &str, fallback: &str, index: usize) -> String {
    let trimmed = name.trim_start_matches('_');
    if trimmed.is_empty() {
        return format!("{fallback}{index}");
    }
    sanitize_ident(&snake_case(trimmed))
}

/// Make every name in the list unique by suffixing repeats with their position
pub fn dedupe(names: &mut [String]) {
    for idx in 1..names.len() {
        if names[..idx].contains(&names[idx]) {
            names[idx] = format!("{}_{}", names[idx], idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("deposit"), "deposit");
        assert_eq!(snake_case("totalAllocPoint"), "total_alloc_point");
        assert_eq!(snake_case("accKukuPerShare"), "acc_kuku_per_share");
        assert_eq!(snake_case("getURI"), "get_uri");
        assert_eq!(snake_case("IKukuFarmer"), "i_kuku_farmer");
        assert_eq!(snake_case("SafeERC20"), "safe_erc20");
        assert_eq!(snake_case("ERC20Token"), "erc20_token");
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name("_pid", "arg", 0), "pid");
        assert_eq!(param_name("lpToken", "field", 0), "lp_token");
        assert_eq!(param_name("", "arg", 2), "arg2");
        assert_eq!(param_name("type", "arg", 0), "type_");
        assert_eq!(param_name("self", "arg", 0), "self_");
    }

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(sanitize_ident("move"), "move_");
        assert_eq!(sanitize_ident("1inch"), "_1inch");
        assert_eq!(sanitize_ident("a$b"), "a_b");
    }

    #[test]
    fn test_descriptor_and_module_names() {
        assert_eq!(descriptor_name("totalAllocPoint"), "TOTAL_ALLOC_POINT");
        assert_eq!(descriptor_name("$fee"), "_FEE");
        assert_eq!(method_name("$fee"), "_fee");
        assert_eq!(method_name("_"), "__");
        assert_eq!(module_name("SafeERC20"), "safe_erc20");
        assert_eq!(module_name("Type"), "type_");
        assert_eq!(module_name("Mod"), "mod_");
    }

    #[test]
    fn test_dedupe() {
        let mut names = vec!["pid".to_string(), "pid".to_string(), "amount".to_string()];
        dedupe(&mut names);
        assert_eq!(names, vec!["pid", "pid_1", "amount"]);
    }
}
