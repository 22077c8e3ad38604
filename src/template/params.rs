// ABOUTME: Request parameter model decoded from the query string
// ABOUTME: Collapses repeated keys into multi-value entries in first-seen order

use indexmap::map::Entry;
use indexmap::IndexMap;
use url::form_urlencoded;

/// Values supplied for one query parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Key present without `=`, e.g. `?flag`
    Empty,
    Single(String),
    /// Two or more values, in request order
    Multi(Vec<String>),
}

impl ParamValue {
    /// Append a further occurrence; an earlier bare key counts as `""`
    fn push(&mut self, value: String) {
        *self = match std::mem::replace(self, ParamValue::Empty) {
            ParamValue::Empty => ParamValue::Multi(vec![String::new(), value]),
            ParamValue::Single(first) => ParamValue::Multi(vec![first, value]),
            ParamValue::Multi(mut values) => {
                values.push(value);
                ParamValue::Multi(values)
            }
        };
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Empty => Vec::new(),
            ParamValue::Single(value) => vec![value.as_str()],
            ParamValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: IndexMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw `application/x-www-form-urlencoded` query string
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::new();

        for segment in query.unwrap_or_default().split('&') {
            if segment.is_empty() {
                continue;
            }

            let has_value = segment.contains('=');
            if let Some((key, value)) = form_urlencoded::parse(segment.as_bytes()).next() {
                if has_value {
                    params.insert(key.into_owned(), value.into_owned());
                } else {
                    params.insert_key(key.into_owned());
                }
            }
        }

        params
    }

    /// Register a name without a value. Repeating it adds an empty value.
    pub fn insert_key(&mut self, name: impl Into<String>) {
        match self.entries.entry(name.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(String::new()),
            Entry::Vacant(entry) => {
                entry.insert(ParamValue::Empty);
            }
        }
    }

    /// Append a value, turning repeated names into a multi-value entry
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        match self.entries.entry(name.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value.into()),
            Entry::Vacant(entry) => {
                entry.insert(ParamValue::Single(value.into()));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
