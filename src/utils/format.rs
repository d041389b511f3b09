use regex::Regex;
use std::sync::OnceLock;

fn bold_bigger_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\w\s]+)\(bold/all/bigger-(\d+)px\)").expect("valid regex"))
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\w\s]+)\((https?://[^)]+)\)").expect("valid regex"))
}

fn bold_all_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\w\s]+)\(bold/all\)").expect("valid regex"))
}

fn bold_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\(bold\)").expect("valid regex"))
}

/// Convert the author-facing inline markup to HTML. Patterns are applied
/// in order: sized bold, links, phrase bold, single-word bold.
pub fn format_text(value: &str) -> String {
    let value = bold_bigger_re().replace_all(value, "<strong style=\"font-size: ${2}px;\">${1}</strong>");
    let value = link_re().replace_all(&value, "<a href=\"${2}\" target=\"_blank\">${1}</a>");
    let value = bold_all_re().replace_all(&value, "<strong>${1}</strong>");
    let value = bold_word_re().replace_all(&value, "<strong>${1}</strong>");
    value.into_owned()
}
