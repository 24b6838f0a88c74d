use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::error::ConfigError;

/// A set of characters, as used for identifier and operator letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Letter,
    Digit,
    AlphaNumeric,
    Whitespace,
    Upper,
    Lower,
    OneOf(String),
    Any(Vec<CharClass>),
}

impl CharClass {
    pub fn matches(&self, ch: char) -> bool {
        match self {
            CharClass::Letter => ch.is_alphabetic(),
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::AlphaNumeric => ch.is_alphanumeric(),
            CharClass::Whitespace => ch.is_whitespace(),
            CharClass::Upper => ch.is_uppercase(),
            CharClass::Lower => ch.is_lowercase(),
            CharClass::OneOf(chars) => chars.contains(ch),
            CharClass::Any(classes) => classes.iter().any(|class| class.matches(ch)),
        }
    }
}

/// Lexical conventions of a language, consumed by [`TokenParser`](super::TokenParser).
///
/// Empty comment markers disable that kind of comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDef {
    #[serde(default)]
    pub comment_start: String,

    #[serde(default)]
    pub comment_end: String,

    #[serde(default)]
    pub comment_line: String,

    #[serde(default = "default_true")]
    pub nested_comments: bool,

    #[serde(default = "default_identifier_start")]
    pub identifier_start: CharClass,

    #[serde(default = "default_identifier_continue")]
    pub identifier_continue: CharClass,

    #[serde(default = "default_operator_letter")]
    pub operator_start: CharClass,

    #[serde(default = "default_operator_letter")]
    pub operator_continue: CharClass,

    #[serde(default)]
    pub reserved_names: Vec<String>,

    #[serde(default)]
    pub reserved_operator_names: Vec<String>,

    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

impl Default for LanguageDef {
    fn default() -> Self {
        Self {
            comment_start: String::new(),
            comment_end: String::new(),
            comment_line: String::new(),
            nested_comments: default_true(),
            identifier_start: default_identifier_start(),
            identifier_continue: default_identifier_continue(),
            operator_start: default_operator_letter(),
            operator_continue: default_operator_letter(),
            reserved_names: Vec::new(),
            reserved_operator_names: Vec::new(),
            case_sensitive: default_true(),
        }
    }
}

impl LanguageDef {
    /// C-like conventions: `/* */` and `//` comments, no nesting, the usual keywords.
    pub fn c_style() -> Self {
        Self {
            comment_start: "/*".to_string(),
            comment_end: "*/".to_string(),
            comment_line: "//".to_string(),
            nested_comments: false,
            reserved_names: [
                "if", "else", "while", "for", "return", "break", "continue", "struct", "int",
                "char", "void",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
            reserved_operator_names: ["=", "==", "!=", "<", "<=", ">", ">=", "&&", "||", "!"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let def: LanguageDef = serde_json::from_str(text)?;
        tracing::debug!(
            reserved = def.reserved_names.len(),
            operators = def.reserved_operator_names.len(),
            "loaded language definition"
        );
        Ok(def)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading language definition");
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let def: LanguageDef = serde_json::from_reader(reader)?;
        Ok(def)
    }

    /// Whether `name` is a reserved word, honouring `case_sensitive`.
    pub fn is_reserved_name(&self, name: &str) -> bool {
        if self.case_sensitive {
            self.reserved_names.iter().any(|reserved| reserved == name)
        } else {
            let name = name.to_lowercase();
            self.reserved_names
                .iter()
                .any(|reserved| reserved.to_lowercase() == name)
        }
    }

    pub fn is_reserved_operator(&self, name: &str) -> bool {
        self.reserved_operator_names.iter().any(|reserved| reserved == name)
    }
}

fn default_true() -> bool {
    true
}

fn default_identifier_start() -> CharClass {
    CharClass::Any(vec![CharClass::Letter, CharClass::OneOf("_".to_string())])
}

fn default_identifier_continue() -> CharClass {
    CharClass::Any(vec![
        CharClass::AlphaNumeric,
        CharClass::OneOf("_'".to_string()),
    ])
}

fn default_operator_letter() -> CharClass {
    CharClass::OneOf(":!#$%&*+./<=>?@\\^|-~".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_char_class() {
        let class = CharClass::Any(vec![CharClass::Digit, CharClass::OneOf("_".into())]);
        assert!(class.matches('7'));
        assert!(class.matches('_'));
        assert!(!class.matches('a'));
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let def = LanguageDef::from_json(
            r##"{
                "comment_line": "#",
                "identifier_start": { "one_of": "abc" },
                "reserved_names": ["def"],
                "case_sensitive": false
            }"##,
        )
        .unwrap();

        assert_eq!(def.comment_line, "#");
        assert_eq!(def.comment_start, "");
        assert!(def.nested_comments);
        assert_eq!(def.identifier_start, CharClass::OneOf("abc".into()));
        assert_eq!(def.identifier_continue, default_identifier_continue());
        assert!(def.is_reserved_name("DEF"));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let error = LanguageDef::from_json("{ \"case_sensitive\": 3 }").unwrap_err();
        assert!(matches!(error, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("parsect-def-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        let json = serde_json::to_string(&LanguageDef::c_style()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let def = LanguageDef::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(def, LanguageDef::c_style());

        let missing = LanguageDef::from_path(path.with_extension("missing")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }

    #[test]
    fn test_reserved_lookup() {
        let def = LanguageDef::c_style();
        assert!(def.is_reserved_name("while"));
        assert!(!def.is_reserved_name("While"));
        assert!(def.is_reserved_operator("=="));
        assert!(!def.is_reserved_operator("+"));
    }
}
