//! Query criteria for alert and trigger listings
//!
//! Every criteria field is optional. The built [`QueryParams`] carries a key
//! only for fields the caller supplied, so `Some(0)` pages and absent pages
//! stay distinguishable.

use std::collections::BTreeMap;

use alertdeck_model::{AlertStatus, Severity};

/// A sparse, ordered set of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    fn set_opt<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Paging and ordering requested by a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page; `Some(0)` is sent as `page=0`
    pub current_page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl PageRequest {
    fn write_into(&self, params: &mut QueryParams) {
        params.set_opt("page", self.current_page);
        params.set_opt("per_page", self.per_page);
        params.set_opt("sort", self.sort.as_deref());
        params.set_opt("order", self.order.map(|o| o.as_str()));
    }
}

fn join<T: AsRef<str>>(items: &[T]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

fn join_tags(tags: &BTreeMap<String, String>) -> String {
    tags.iter()
        .map(|(name, value)| format!("{name}|{value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter for `GET /alerts`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertsCriteria {
    /// Epoch milliseconds
    pub start_time: Option<i64>,
    /// Epoch milliseconds
    pub end_time: Option<i64>,
    pub alert_ids: Option<Vec<String>>,
    pub trigger_ids: Option<Vec<String>>,
    pub statuses: Option<Vec<AlertStatus>>,
    pub severities: Option<Vec<Severity>>,
    pub tags: Option<BTreeMap<String, String>>,
    pub thin: Option<bool>,
    pub paging: PageRequest,
}

impl AlertsCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_range(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    pub fn with_alert_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alert_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_trigger_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = AlertStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_severities(mut self, severities: impl IntoIterator<Item = Severity>) -> Self {
        self.severities = Some(severities.into_iter().collect());
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn thin(mut self, thin: bool) -> Self {
        self.thin = Some(thin);
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.paging.current_page = Some(page);
        self.paging.per_page = Some(per_page);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.paging.sort = Some(field.into());
        self.paging.order = Some(order);
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_opt("startTime", self.start_time);
        params.set_opt("endTime", self.end_time);
        params.set_opt("alertIds", self.alert_ids.as_deref().map(join));
        params.set_opt("triggerIds", self.trigger_ids.as_deref().map(join));
        params.set_opt(
            "statuses",
            self.statuses
                .as_ref()
                .map(|s| join(&s.iter().map(|s| s.as_str()).collect::<Vec<_>>())),
        );
        params.set_opt(
            "severities",
            self.severities
                .as_ref()
                .map(|s| join(&s.iter().map(|s| s.as_str()).collect::<Vec<_>>())),
        );
        params.set_opt("tags", self.tags.as_ref().map(join_tags));
        params.set_opt("thin", self.thin);
        self.paging.write_into(&mut params);
        params
    }
}

/// Filter for `GET /triggers`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggersCriteria {
    pub trigger_ids: Option<Vec<String>>,
    pub tags: Option<BTreeMap<String, String>>,
    pub thin: Option<bool>,
    pub paging: PageRequest,
}

impl TriggersCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trigger_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn thin(mut self, thin: bool) -> Self {
        self.thin = Some(thin);
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.paging.current_page = Some(page);
        self.paging.per_page = Some(per_page);
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_opt("triggerIds", self.trigger_ids.as_deref().map(join));
        params.set_opt("tags", self.tags.as_ref().map(join_tags));
        params.set_opt("thin", self.thin);
        self.paging.write_into(&mut params);
        params
    }
}
