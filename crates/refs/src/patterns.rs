//! Compiled reference patterns shared by the scanners.

use once_cell::sync::Lazy;
use regex::Regex;

/// One A1 cell reference, optionally `$`-anchored on either axis.
const CELL: &str = r"\$?[A-Z][A-Z]?\$?[0-9]+";

/// Function names containing digits. Longer names come first so that
/// `IMLOG10` wins over `LOG10`.
const DIGIT_FUNCTIONS: &str = r"SUMX2MY2|SUMX2PY2|SUMXMY2|IMLOG10|IMLOG2|T\.DIST\.2T|T\.INV\.2T|BIN2DEC|BIN2HEX|BIN2OCT|DEC2BIN|DEC2HEX|DEC2OCT|HEX2BIN|HEX2DEC|HEX2OCT|OCT2BIN|OCT2DEC|OCT2HEX|DAYS360|ATAN2|LOG10";

pub(crate) static DIGIT_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(DIGIT_FUNCTIONS).expect("valid regex"));

/// `'Quoted Sheet'!A1`, `Sheet2!A1:B9` and friends.
pub(crate) static SHEET_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:'[^']*'|[A-Za-z0-9_.]+)!{CELL}(?::{CELL})?")).expect("valid regex")
});

/// `Table1[Column]`, `[@Amount]`.
pub(crate) static STRUCTURED_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

pub(crate) static RANGE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"({CELL}):({CELL})")).expect("valid regex"));

pub(crate) static SINGLE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("({CELL})")).expect("valid regex"));

pub(crate) static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+\.?[0-9]*").expect("valid regex"));

/// Either a digit-named function (left untouched) or a cell reference.
pub(crate) static FUNCTION_OR_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?P<func>{DIGIT_FUNCTIONS})|(?P<cell>{CELL})")).expect("valid regex")
});

/// Remove everything that must not be read as a local reference.
pub(crate) fn strip_non_local(formula: &str) -> String {
    let text = DIGIT_FUNCTION.replace_all(formula, "_");
    let text = SHEET_REFERENCE.replace_all(&text, "_");
    STRUCTURED_REFERENCE.replace_all(&text, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_non_local() {
        assert_eq!(strip_non_local("=LOG10(A1)"), "=_(A1)");
        assert_eq!(strip_non_local("=IMLOG10(A1)"), "=_(A1)");
        assert_eq!(strip_non_local("=Sheet2!B3+C4"), "=_+C4");
        assert_eq!(strip_non_local("=SUM('My Data'!A1:A9)"), "=SUM(_)");
        assert_eq!(strip_non_local("=SUM(Table1[Amount])"), "=SUM(Table1_)");
        assert_eq!(strip_non_local("=T.DIST.2T(A1,3)"), "=_(A1,3)");
    }

    #[test]
    fn test_function_or_ref_prefers_function() {
        let caps = FUNCTION_OR_REF.captures("LOG10").unwrap();
        assert!(caps.name("func").is_some());
        let caps = FUNCTION_OR_REF.captures("$B$7").unwrap();
        assert_eq!(caps.name("cell").unwrap().as_str(), "$B$7");
    }
}
