//! Declarative shape of a blueprint response.
//!
//! The same contract is rendered as the provider's `responseSchema` and used to
//! check the parsed response before it becomes a typed [`crate::blueprint::Blueprint`].

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    String,
    Array(Box<Shape>),
    Object(ObjectShape),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::String => "string",
            Shape::Array(_) => "array",
            Shape::Object(_) => "object",
        }
    }

    fn to_provider_schema(&self) -> Value {
        match self {
            Shape::String => json!({ "type": "STRING" }),
            Shape::Array(items) => json!({
                "type": "ARRAY",
                "items": items.to_provider_schema(),
            }),
            Shape::Object(object) => object.to_provider_schema(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectShape {
    pub fields: Vec<Field>,
}

impl ObjectShape {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
            .collect()
    }

    fn to_provider_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.shape.to_provider_schema());
        }
        let ordering: Vec<&str> = self.fields.iter().map(|field| field.name).collect();
        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.required_names(),
            "propertyOrdering": ordering,
        })
    }
}

fn required(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: true,
    }
}

fn optional(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: false,
    }
}

fn object(fields: Vec<Field>) -> Shape {
    Shape::Object(ObjectShape::new(fields))
}

fn array_of(items: Shape) -> Shape {
    Shape::Array(Box::new(items))
}

/// A required field was missing or had the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{path}` expected {expected}, found {found}")]
pub struct SchemaViolation {
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

/// Result of [`SchemaContract::conform`]: the accepted value plus the
/// optional paths that were dropped because their shape was wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformed {
    pub value: Value,
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaContract {
    root: ObjectShape,
}

impl SchemaContract {
    pub fn new(root: ObjectShape) -> Self {
        Self { root }
    }

    /// The blueprint response contract. Only the minimal set is required;
    /// everything else the model may omit.
    pub fn blueprint() -> Self {
        let copy_option = object(vec![
            required("headline", Shape::String),
            required("body", Shape::String),
        ]);
        let visual_direction = object(vec![
            required("assetConcept", Shape::String),
            required("moodDescription", Shape::String),
            optional("lighting", Shape::String),
            optional("composition", Shape::String),
        ]);
        let motion_directive = object(vec![
            required("animation", Shape::String),
            required("buttonStyle", Shape::String),
            required("typography", Shape::String),
            optional("divider", Shape::String),
            optional("layoutStrategy", Shape::String),
            optional("compositionAndShapes", Shape::String),
        ]);
        let interaction_proposal = object(vec![
            required("kind", Shape::String),
            required("description", Shape::String),
            required("userBenefit", Shape::String),
        ]);
        let comparison_row = object(vec![
            required("feature", Shape::String),
            required("ours", Shape::String),
            required("competitor", Shape::String),
        ]);
        let faq_row = object(vec![
            required("question", Shape::String),
            required("answer", Shape::String),
        ]);
        let section = object(vec![
            required("sectionId", Shape::String),
            required("title", Shape::String),
            required("copyOptions", array_of(copy_option)),
            required("analysis", Shape::String),
            required("visualDirection", visual_direction),
            required("motionDirective", motion_directive),
            optional("interactionProposal", interaction_proposal),
            optional("comparisonRows", array_of(comparison_row)),
            optional("faqRows", array_of(faq_row)),
        ]);

        Self::new(ObjectShape::new(vec![
            required("brandName", Shape::String),
            required("brandStory", Shape::String),
            required("seoTitle", Shape::String),
            required("metaDescription", Shape::String),
            required("globalDesignGuideline", Shape::String),
            required("sections", array_of(section)),
        ]))
    }

    pub fn root(&self) -> &ObjectShape {
        &self.root
    }

    /// Provider-facing structural constraint (OpenAPI-style subset with upper-case type names).
    pub fn to_provider_schema(&self) -> Value {
        self.root.to_provider_schema()
    }

    /// Checks `value` without modifying it.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.conform(value.clone()).map(|_| ())
    }

    /// Checks required fields and strips optional fields whose shape is wrong.
    pub fn conform(&self, value: Value) -> Result<Conformed, SchemaViolation> {
        let mut dropped = Vec::new();
        let value = conform_object(&self.root, value, "$", &mut dropped)?;
        Ok(Conformed { value, dropped })
    }
}

fn conform_shape(
    shape: &Shape,
    value: Value,
    path: &str,
    dropped: &mut Vec<String>,
) -> Result<Value, SchemaViolation> {
    match (shape, value) {
        (Shape::String, Value::String(text)) => Ok(Value::String(text)),
        (Shape::Array(items), Value::Array(rows)) => {
            let mut out = Vec::with_capacity(rows.len());
            for (idx, row) in rows.into_iter().enumerate() {
                out.push(conform_shape(items, row, &format!("{path}[{idx}]"), dropped)?);
            }
            Ok(Value::Array(out))
        }
        (Shape::Object(object), value @ Value::Object(_)) => {
            conform_object(object, value, path, dropped)
        }
        (shape, other) => Err(SchemaViolation {
            path: path.to_string(),
            expected: shape.kind(),
            found: value_kind(Some(&other)),
        }),
    }
}

fn conform_object(
    object: &ObjectShape,
    value: Value,
    path: &str,
    dropped: &mut Vec<String>,
) -> Result<Value, SchemaViolation> {
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(SchemaViolation {
                path: path.to_string(),
                expected: "object",
                found: value_kind(Some(&other)),
            })
        }
    };

    for field in &object.fields {
        let field_path = format!("{path}.{}", field.name);
        let present = map.remove(field.name).filter(|value| !value.is_null());
        let Some(raw) = present else {
            if field.required {
                return Err(SchemaViolation {
                    path: field_path,
                    expected: field.shape.kind(),
                    found: "missing",
                });
            }
            continue;
        };

        if field.required {
            let conformed = conform_shape(&field.shape, raw, &field_path, dropped)?;
            map.insert(field.name.to_string(), conformed);
            continue;
        }

        let mut nested_dropped = Vec::new();
        match conform_shape(&field.shape, raw, &field_path, &mut nested_dropped) {
            Ok(conformed) => {
                dropped.extend(nested_dropped);
                map.insert(field.name.to_string(), conformed);
            }
            Err(violation) => {
                tracing::debug!(path = %field_path, %violation, "dropping optional field");
                dropped.push(field_path);
            }
        }
    }

    Ok(Value::Object(map))
}

fn value_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{SchemaContract, SchemaViolation};

    fn minimal_section(id: &str) -> Value {
        json!({
            "sectionId": id,
            "title": "Title",
            "copyOptions": [
                {"headline": "h1", "body": "b1"},
                {"headline": "h2", "body": "b2"},
                {"headline": "h3", "body": "b3"}
            ],
            "analysis": "why it works",
            "visualDirection": {"assetConcept": "photo", "moodDescription": "calm"},
            "motionDirective": {
                "animation": "fade-up",
                "buttonStyle": "pill",
                "typography": "serif"
            }
        })
    }

    fn minimal_blueprint() -> Value {
        json!({
            "brandName": "Test Cafe",
            "brandStory": "story",
            "seoTitle": "title",
            "metaDescription": "desc",
            "globalDesignGuideline": "guide",
            "sections": [minimal_section("hero")]
        })
    }

    #[test]
    fn minimal_blueprint_validates() {
        assert_eq!(
            SchemaContract::blueprint().validate(&minimal_blueprint()),
            Ok(())
        );
    }

    #[test]
    fn missing_sections_is_a_violation() {
        let mut value = minimal_blueprint();
        if let Some(map) = value.as_object_mut() {
            map.remove("sections");
        }
        assert_eq!(
            SchemaContract::blueprint().validate(&value),
            Err(SchemaViolation {
                path: "$.sections".to_string(),
                expected: "array",
                found: "missing",
            })
        );
    }

    #[test]
    fn wrong_kind_in_nested_required_field_reports_path() {
        let mut value = minimal_blueprint();
        value["sections"][0]["copyOptions"][1]["headline"] = json!(42);
        let err = SchemaContract::blueprint()
            .validate(&value)
            .err()
            .map(|violation| violation.to_string());
        assert_eq!(
            err.as_deref(),
            Some("field `$.sections[0].copyOptions[1].headline` expected string, found number")
        );
    }

    #[test]
    fn null_required_field_is_a_violation() {
        let mut value = minimal_blueprint();
        value["seoTitle"] = Value::Null;
        let violation = SchemaContract::blueprint().validate(&value).err();
        assert_eq!(violation.map(|v| v.found), Some("missing"));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let violation = SchemaContract::blueprint().validate(&json!([1, 2])).err();
        assert_eq!(
            violation.map(|v| (v.path, v.found)),
            Some(("$".to_string(), "array"))
        );
    }

    #[test]
    fn malformed_optional_fields_are_dropped_not_fatal() -> anyhow::Result<()> {
        let mut value = minimal_blueprint();
        value["sections"][0]["interactionProposal"] = json!("just a string");
        value["sections"][0]["comparisonRows"] = json!([{"feature": "price", "ours": "low"}]);
        value["sections"][0]["visualDirection"]["lighting"] = json!(7);
        value["sections"][0]["faqRows"] = json!([{"question": "q", "answer": "a"}]);

        let conformed = SchemaContract::blueprint().conform(value)?;
        let section = &conformed.value["sections"][0];
        assert!(section.get("interactionProposal").is_none());
        assert!(section.get("comparisonRows").is_none());
        assert!(section["visualDirection"].get("lighting").is_none());
        assert_eq!(section["faqRows"][0]["answer"], json!("a"));
        assert_eq!(
            conformed.dropped,
            vec![
                "$.sections[0].visualDirection.lighting".to_string(),
                "$.sections[0].interactionProposal".to_string(),
                "$.sections[0].comparisonRows".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn unknown_fields_pass_through() -> anyhow::Result<()> {
        let mut value = minimal_blueprint();
        value["primaryColor"] = json!("#000000");
        let conformed = SchemaContract::blueprint().conform(value)?;
        assert_eq!(conformed.value["primaryColor"], json!("#000000"));
        Ok(())
    }

    #[test]
    fn provider_schema_lists_required_fields_and_types() {
        let schema = SchemaContract::blueprint().to_provider_schema();
        assert_eq!(schema["type"], json!("OBJECT"));
        assert_eq!(
            schema["required"],
            json!([
                "brandName",
                "brandStory",
                "seoTitle",
                "metaDescription",
                "globalDesignGuideline",
                "sections"
            ])
        );
        let section = &schema["properties"]["sections"]["items"];
        assert_eq!(section["type"], json!("OBJECT"));
        assert_eq!(
            section["properties"]["copyOptions"]["items"]["required"],
            json!(["headline", "body"])
        );
        let required = section["required"].as_array().cloned().unwrap_or_default();
        assert!(!required.contains(&json!("interactionProposal")));
        assert!(required.contains(&json!("motionDirective")));
        assert_eq!(section["propertyOrdering"][0], json!("sectionId"));
    }
}
