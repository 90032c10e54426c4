use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::ModelError;
use crate::Identified;

/// Required on create, checked in this order.
pub const REQUIRED_FIELDS: [&str; 6] = ["title", "description", "code", "price", "stock", "category"];

/// Catalog record as stored in `products.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: f64,
    pub status: bool,
    /// Kept as the JSON number it was sent as, so `4` stays `4` and `2.5` stays `2.5`.
    pub stock: Number,
    pub category: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

impl Identified for Product {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Validated create input: every field except the id, defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: f64,
    pub status: bool,
    pub stock: Number,
    pub category: String,
    pub thumbnails: Vec<String>,
}

impl NewProduct {
    /// Parse a JSON object sent by a client.
    ///
    /// Presence of every required field is checked first (null counts as
    /// missing), then types and constraints. Unknown keys are ignored.
    pub fn from_json(obj: &Map<String, Value>) -> Result<Self, ModelError> {
        for field in REQUIRED_FIELDS {
            match obj.get(field) {
                None | Some(Value::Null) => return Err(ModelError::MissingField(field)),
                Some(_) => {}
            }
        }
        // presence checked above, indexing cannot miss
        Ok(Self {
            title: text("title", &obj["title"])?,
            description: text("description", &obj["description"])?,
            code: text("code", &obj["code"])?,
            price: price(&obj["price"])?,
            stock: stock(&obj["stock"])?,
            category: text("category", &obj["category"])?,
            status: status(obj.get("status"))?,
            thumbnails: thumbnails(obj.get("thumbnails"))?,
        })
    }

    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            code: self.code,
            price: self.price,
            status: self.status,
            stock: self.stock,
            category: self.category,
            thumbnails: self.thumbnails,
        }
    }
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<f64>,
    pub status: Option<bool>,
    pub stock: Option<Number>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
}

impl ProductPatch {
    /// Parse a partial JSON object. Each present field obeys the create rules,
    /// except that null is rejected everywhere. Unknown keys are ignored, as on create.
    pub fn from_json(obj: &Map<String, Value>) -> Result<Self, ModelError> {
        let mut patch = Self::default();
        if let Some(v) = obj.get("title") { patch.title = Some(text("title", v)?); }
        if let Some(v) = obj.get("description") { patch.description = Some(text("description", v)?); }
        if let Some(v) = obj.get("code") { patch.code = Some(text("code", v)?); }
        if let Some(v) = obj.get("price") { patch.price = Some(price(v)?); }
        if let Some(v) = obj.get("stock") { patch.stock = Some(stock(v)?); }
        if let Some(v) = obj.get("category") { patch.category = Some(text("category", v)?); }
        if let Some(v) = obj.get("status") { patch.status = Some(status(Some(non_null("status", v)?))?); }
        if let Some(v) = obj.get("thumbnails") { patch.thumbnails = Some(thumbnails(Some(non_null("thumbnails", v)?))?); }
        Ok(patch)
    }
}

impl Product {
    /// Shallow merge; the id is never touched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(v) = patch.title { self.title = v; }
        if let Some(v) = patch.description { self.description = v; }
        if let Some(v) = patch.code { self.code = v; }
        if let Some(v) = patch.price { self.price = v; }
        if let Some(v) = patch.status { self.status = v; }
        if let Some(v) = patch.stock { self.stock = v; }
        if let Some(v) = patch.category { self.category = v; }
        if let Some(v) = patch.thumbnails { self.thumbnails = v; }
    }
}

fn text(field: &'static str, v: &Value) -> Result<String, ModelError> {
    match v.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(ModelError::invalid(field, "must be a non-empty string")),
    }
}

fn price(v: &Value) -> Result<f64, ModelError> {
    match v.as_f64() {
        Some(p) if p.is_finite() && p > 0.0 => Ok(p),
        _ => Err(ModelError::invalid("price", "must be a number greater than 0")),
    }
}

fn stock(v: &Value) -> Result<Number, ModelError> {
    match v {
        Value::Number(n) if n.as_f64().is_some_and(|s| s.is_finite() && s >= 0.0) => Ok(n.clone()),
        _ => Err(ModelError::invalid("stock", "must be a number greater than or equal to 0")),
    }
}

// Defaults apply on create only; a patch that sends null means nothing valid.
fn non_null<'a>(field: &'static str, v: &'a Value) -> Result<&'a Value, ModelError> {
    match v {
        Value::Null => Err(ModelError::invalid(field, "must not be null")),
        other => Ok(other),
    }
}

fn status(v: Option<&Value>) -> Result<bool, ModelError> {
    match v {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ModelError::invalid("status", "must be a boolean")),
    }
}

fn thumbnails(v: Option<&Value>) -> Result<Vec<String>, ModelError> {
    match v {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ModelError::invalid("thumbnails", "must be a list of strings"))
            })
            .collect(),
        Some(_) => Err(ModelError::invalid("thumbnails", "must be a list of strings")),
    }
}
