//! Resolve, acknowledge and annotate alerts
//!
//! These are pass-through bulk calls. `alert_ids` is the comma-joined list
//! the backend expects; it is sent as given, empty or not.

fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub alert_ids: String,
    pub resolved_by: String,
    pub resolved_notes: Option<String>,
}

impl ResolveRequest {
    pub fn new(alert_ids: impl Into<String>, resolved_by: impl Into<String>) -> Self {
        Self {
            alert_ids: alert_ids.into(),
            resolved_by: resolved_by.into(),
            resolved_notes: None,
        }
    }

    pub fn for_alerts<S: AsRef<str>>(ids: &[S], resolved_by: impl Into<String>) -> Self {
        Self::new(join_ids(ids), resolved_by)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.resolved_notes = Some(notes.into());
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("alertIds", self.alert_ids.clone()),
            ("resolvedBy", self.resolved_by.clone()),
        ];
        if let Some(notes) = &self.resolved_notes {
            pairs.push(("resolvedNotes", notes.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckRequest {
    pub alert_ids: String,
    pub ack_by: String,
    pub ack_notes: Option<String>,
}

impl AckRequest {
    pub fn new(alert_ids: impl Into<String>, ack_by: impl Into<String>) -> Self {
        Self {
            alert_ids: alert_ids.into(),
            ack_by: ack_by.into(),
            ack_notes: None,
        }
    }

    pub fn for_alerts<S: AsRef<str>>(ids: &[S], ack_by: impl Into<String>) -> Self {
        Self::new(join_ids(ids), ack_by)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.ack_notes = Some(notes.into());
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("alertIds", self.alert_ids.clone()),
            ("ackBy", self.ack_by.clone()),
        ];
        if let Some(notes) = &self.ack_notes {
            pairs.push(("ackNotes", notes.clone()));
        }
        pairs
    }
}

/// A note on a single alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    pub alert_id: String,
    pub user: String,
    pub text: String,
}

impl NoteRequest {
    pub fn new(
        alert_id: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            alert_id: alert_id.into(),
            user: user.into(),
            text: text.into(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("alertId", self.alert_id.clone()),
            ("user", self.user.clone()),
            ("text", self.text.clone()),
        ]
    }
}
