use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde_json::{Map, Value};

use crate::error::FrontMatterError;

/// Loosely-typed metadata record plus the markdown body that follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub attributes: Map<String, Value>,
    pub body: String,
}

impl TryFrom<&str> for FrontMatter {
    type Error = FrontMatterError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        extract(value)
    }
}

/// Split the leading `---` YAML block from `raw` and parse it.
pub fn extract(raw: &str) -> Result<FrontMatter, FrontMatterError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<Value> = matter
        .parse(raw)
        .map_err(|e| FrontMatterError::Yaml(e.to_string()))?;

    let attributes = match parsed.data {
        None | Some(Value::Null) => return Err(FrontMatterError::Missing),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(FrontMatterError::NotAMapping),
    };

    Ok(FrontMatter {
        attributes,
        body: parsed.content,
    })
}
