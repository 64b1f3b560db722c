//! Query predicates and search options

use std::fmt;

/// A single search predicate, e.g. `[at(document.type, "posts")]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals value
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Documents of a custom type
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }

    /// Document with the given id
    pub fn document_id(id: &str) -> Self {
        Self::at("document.id", id)
    }

    /// Document of `doc_type` whose uid is `uid`
    pub fn uid(doc_type: &str, uid: &str) -> Self {
        Self::at(format!("my.{}.uid", doc_type), uid)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At { path, value } => write!(f, "[at({}, {})]", path, quote(value)),
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render predicates as the `q` query parameter
pub fn to_query(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(ToString::to_string).collect();
    format!("[{}]", inner)
}

/// Sort key for a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Options accepted by a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Restrict `data` to these `type.field` entries
    pub fetch: Vec<String>,
    pub page_size: Option<usize>,
    pub orderings: Vec<Ordering>,
    /// Only return documents positioned after this document id
    pub after: Option<String>,
}

impl QueryOptions {
    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn after(mut self, id: impl Into<String>) -> Self {
        self.after = Some(id.into());
        self
    }

    /// The `orderings` parameter, e.g. `[document.first_publication_date desc]`
    pub fn orderings_param(&self) -> Option<String> {
        if self.orderings.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .orderings
            .iter()
            .map(|o| {
                if o.descending {
                    format!("{} desc", o.field)
                } else {
                    o.field.clone()
                }
            })
            .collect();
        Some(format!("[{}]", parts.join(",")))
    }
}

/// A fully specified search against one ref
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub reference: String,
    pub predicates: Vec<Predicate>,
    pub options: QueryOptions,
}

impl SearchQuery {
    /// Query string parameters, access token excluded
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ref", self.reference.clone()),
            ("q", to_query(&self.predicates)),
        ];
        if !self.options.fetch.is_empty() {
            params.push(("fetch", self.options.fetch.join(",")));
        }
        if let Some(size) = self.options.page_size {
            params.push(("pageSize", size.to_string()));
        }
        if let Some(orderings) = self.options.orderings_param() {
            params.push(("orderings", orderings));
        }
        if let Some(after) = &self.options.after {
            params.push(("after", after.clone()));
        }
        params
    }
}
