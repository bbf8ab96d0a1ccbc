//! Document categories and the backend endpoints they map to.
//!
//! The mapping is exhaustive over [`Category`]: a category with no endpoint
//! for a given kind of input yields [`SummarizeError::UnsupportedCategory`]
//! instead of a request to an empty path.

use crate::error::SummarizeError;
use std::fmt;
use std::str::FromStr;

/// Endpoint for bill summaries (text input).
pub const BILLS_ENDPOINT: &str = "/summarize/led_billsum";

/// Endpoint for court judgement summaries (text input).
pub const JUDGEMENTS_ENDPOINT: &str = "/summarize/led_judgment";

/// Prefix for file uploads; the category identifier is appended.
pub const FILE_ENDPOINT_PREFIX: &str = "/summarize/file/";

/// Kind of legal document being summarized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Legislative bills.
    Bills,
    /// Court judgements.
    Judgements,
    /// Everything else. Not backed by a model yet.
    Other,
    /// Any other identifier. Only file uploads have an endpoint for it.
    Custom(CategoryId),
}

/// Identifier of a [`Category::Custom`].
///
/// Always non-empty `[a-z0-9_-]`, so it is safe as a single URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryId(String);

impl CategoryId {
    /// Validate and lowercase `id`.
    pub fn new(id: &str) -> Result<Self, SummarizeError> {
        let normalized = id.trim().to_lowercase();
        if !is_valid_identifier(&normalized) {
            return Err(SummarizeError::InvalidCategory {
                input: id.to_string(),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Category {
    /// Custom category from a free-form identifier.
    pub fn custom(id: &str) -> Result<Self, SummarizeError> {
        CategoryId::new(id).map(Category::Custom)
    }

    /// Wire identifier, as used in the file upload path.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Bills => "bills",
            Category::Judgements => "judgements",
            Category::Other => "other",
            Category::Custom(id) => id.as_str(),
        }
    }

    /// True for the category whose feature is still under construction.
    pub fn is_stub(&self) -> bool {
        matches!(self, Category::Other)
    }

    /// Path of the endpoint accepting `{"text": ...}` for this category.
    pub fn text_endpoint(&self) -> Result<&'static str, SummarizeError> {
        match self {
            Category::Bills => Ok(BILLS_ENDPOINT),
            Category::Judgements => Ok(JUDGEMENTS_ENDPOINT),
            Category::Other | Category::Custom(_) => Err(self.unsupported("text")),
        }
    }

    /// Path of the multipart upload endpoint for this category.
    pub fn file_endpoint(&self) -> Result<String, SummarizeError> {
        if self.is_stub() {
            return Err(self.unsupported("file"));
        }
        Ok(format!("{FILE_ENDPOINT_PREFIX}{}", self.as_str()))
    }

    fn unsupported(&self, input: &'static str) -> SummarizeError {
        SummarizeError::UnsupportedCategory {
            category: self.as_str().to_string(),
            input,
        }
    }
}

impl FromStr for Category {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        match id.as_str() {
            "bills" => Ok(Category::Bills),
            "judgements" | "judgments" => Ok(Category::Judgements),
            "other" => Ok(Category::Other),
            _ => Category::custom(s),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Custom identifiers end up in a URL path segment.
fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_categories() {
        assert_eq!("bills".parse::<Category>().unwrap(), Category::Bills);
        assert_eq!(" Judgements ".parse::<Category>().unwrap(), Category::Judgements);
        assert_eq!("judgments".parse::<Category>().unwrap(), Category::Judgements);
        assert_eq!("OTHER".parse::<Category>().unwrap(), Category::Other);
    }

    #[test]
    fn parse_custom_and_invalid() {
        assert_eq!(
            "contracts".parse::<Category>().unwrap(),
            Category::custom("contracts").unwrap()
        );
        assert!(matches!(
            "".parse::<Category>(),
            Err(SummarizeError::InvalidCategory { .. })
        ));
        assert!(matches!(
            "../etc".parse::<Category>(),
            Err(SummarizeError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn custom_id_cannot_escape_upload_path() {
        for id in ["../led_billsum", "a/b", "led billsum", "x?y=1", ""] {
            assert!(
                matches!(CategoryId::new(id), Err(SummarizeError::InvalidCategory { .. })),
                "{id:?} accepted"
            );
        }
        let id = CategoryId::new(" Contracts ").unwrap();
        assert_eq!(id.as_str(), "contracts");
        assert_eq!(
            Category::Custom(id).file_endpoint().unwrap(),
            "/summarize/file/contracts"
        );
    }

    #[test]
    fn text_endpoints() {
        assert_eq!(Category::Bills.text_endpoint().unwrap(), "/summarize/led_billsum");
        assert_eq!(
            Category::Judgements.text_endpoint().unwrap(),
            "/summarize/led_judgment"
        );
        assert!(matches!(
            Category::custom("contracts").unwrap().text_endpoint(),
            Err(SummarizeError::UnsupportedCategory { input: "text", .. })
        ));
        assert!(Category::Other.text_endpoint().is_err());
    }

    #[test]
    fn file_endpoints() {
        assert_eq!(Category::Bills.file_endpoint().unwrap(), "/summarize/file/bills");
        assert_eq!(
            Category::custom("contracts").unwrap().file_endpoint().unwrap(),
            "/summarize/file/contracts"
        );
        assert!(matches!(
            Category::Other.file_endpoint(),
            Err(SummarizeError::UnsupportedCategory { input: "file", .. })
        ));
    }

    #[test]
    fn only_other_is_stub() {
        assert!(Category::Other.is_stub());
        assert!(!Category::Bills.is_stub());
        assert!(!Category::custom("x").unwrap().is_stub());
    }
}
