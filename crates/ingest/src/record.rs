use serde::{Deserialize, Serialize};

/// Wire shape of one annotation: `[type, [values...]]`.
type AnnotationPair = (String, Vec<String>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnnotationPair", into = "AnnotationPair")]
pub struct EntityAnnotation {
    pub entity_type: String,
    pub values: Vec<String>,
}

impl EntityAnnotation {
    pub fn new(entity_type: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            values,
        }
    }
}

impl From<AnnotationPair> for EntityAnnotation {
    fn from((entity_type, values): AnnotationPair) -> Self {
        Self { entity_type, values }
    }
}

impl From<EntityAnnotation> for AnnotationPair {
    fn from(annotation: EntityAnnotation) -> Self {
        (annotation.entity_type, annotation.values)
    }
}

/// One annotated input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub text: String,
    pub entities: Vec<EntityAnnotation>,
}

impl RawRecord {
    pub fn new(text: impl Into<String>, entities: Vec<EntityAnnotation>) -> Self {
        Self {
            text: text.into(),
            entities,
        }
    }

    /// Entity types in annotation order.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.entity_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_annotations() {
        let line = r#"{"text": "Одна из дочерей Джаку.", "entities": [["person", ["Джаку", "Амира Темура"]]]}"#;
        let record: RawRecord = serde_json::from_str(line).unwrap();

        assert_eq!(record.text, "Одна из дочерей Джаку.");
        assert_eq!(record.entities.len(), 1);
        assert_eq!(record.entities[0].entity_type, "person");
        assert_eq!(record.entities[0].values, vec!["Джаку", "Амира Темура"]);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let line = r#"{"text": "x", "entities": [], "source": "wiki"}"#;
        let record: RawRecord = serde_json::from_str(line).unwrap();
        assert!(record.entities.is_empty());
    }

    #[test]
    fn test_missing_entities_rejected() {
        let line = r#"{"text": "x"}"#;
        assert!(serde_json::from_str::<RawRecord>(line).is_err());
    }

    #[test]
    fn test_wrong_annotation_shape_rejected() {
        let line = r#"{"text": "x", "entities": [["person", "A"]]}"#;
        assert!(serde_json::from_str::<RawRecord>(line).is_err());
    }

    #[test]
    fn test_serializes_back_to_pairs() {
        let record = RawRecord::new(
            "A met B.",
            vec![EntityAnnotation::new("person", vec!["A".into(), "B".into()])],
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"text":"A met B.","entities":[["person",["A","B"]]]}"#);
    }
}
