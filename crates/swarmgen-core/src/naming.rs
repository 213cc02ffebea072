//! Identifier transformations shared by model extraction and rendering.
//!
//! Every name that reaches a generated file (class names, field names,
//! accessors, package segments, artifact ids) goes through this module, so a
//! schema property called `first_name` becomes `firstName` in the bean, in its
//! accessors and in every resource that references it.

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;

static JAVA_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while", "_",
];

/// Split an identifier into words.
///
/// Word boundaries are any non-alphanumeric character, a lowercase or digit to
/// uppercase transition (`findPets`), and the end of an acronym (`HTTPResponse`).
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
    }
}

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert a string to SCREAMING_SNAKE_CASE
pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

/// Convert a string to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Convert a string to UpperCamelCase (PascalCase)
pub fn to_upper_camel_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert a string to lowerCamelCase
pub fn to_lower_camel_case(s: &str) -> String {
    let mut result = String::new();
    for (i, word) in split_words(s).iter().enumerate() {
        if i == 0 {
            result.push_str(&word.to_ascii_lowercase());
        } else {
            result.push_str(&capitalize(word));
        }
    }
    result
}

/// Whether `s` is a reserved word in Java.
pub fn is_java_keyword(s: &str) -> bool {
    JAVA_KEYWORDS.contains(&s)
}

/// Whether `s` is usable as a single Java identifier.
pub fn is_java_identifier(s: &str) -> bool {
    JAVA_IDENTIFIER.is_match(s) && !is_java_keyword(s)
}

/// Whether `s` is a dotted Java package name (`io.openapi.simple`).
pub fn is_java_package(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_java_identifier)
}

fn guard_identifier(mut ident: String, fallback: &str) -> String {
    if ident.is_empty() {
        return fallback.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if is_java_keyword(&ident) {
        ident.push('_');
    }
    ident
}

/// Java class name for a schema, resource or operation name.
pub fn java_class_name(s: &str) -> String {
    guard_identifier(to_upper_camel_case(s), "Unnamed")
}

/// Java field / parameter / method name.
pub fn java_field_name(s: &str) -> String {
    guard_identifier(to_lower_camel_case(s), "value")
}

/// Java enum constant for an enum value (`in-stock` -> `IN_STOCK`).
pub fn java_constant_name(s: &str) -> String {
    guard_identifier(to_screaming_snake_case(s), "VALUE")
}

/// Bean accessor suffix (`firstName` -> `FirstName`).
pub fn accessor_suffix(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
    }
}

/// A single lowercase package segment built from free text (`Beer API` -> `beerapi`).
pub fn package_segment(s: &str) -> String {
    let compact: String = split_words(s)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect();
    guard_identifier(compact, "")
}

/// Directory path for a package (`io.openapi.simple` -> `io/openapi/simple`).
pub fn package_path(package: &str) -> String {
    package.replace('.', "/")
}
