//! Service directory records and the persisted directory document.
//!
//! The whole directory is stored as one JSON document:
//!
//! ```json
//! {"services":[{"name":"Jira","owner":"Dev Tools","room":"Dev Tools Help",
//!   "url":"https://chat.example.com/room/jira","aliases":["tickets"]}],"version":3}
//! ```
//!
//! Field order on serialisation follows the struct declarations below, which
//! keeps the `export` command output stable for humans reading it.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Version assigned to a document that carries no (or a zero) version.
pub const INITIAL_VERSION: u64 = 1;

/// One directory entry: who owns a service and where to find them.
///
/// ## Invariants
/// - `name` and every alias are unique, compared case-insensitively, across
///   all names and aliases of the directory. Only
///   [`ServiceDirectory::add`](crate::domain::ServiceDirectory::add) enforces
///   this; documents loaded from the store are trusted as-is.
/// - `url` is free text and is not validated as a URL.
/// - Keys the bot does not know about are kept in `extra` and written back
///   unchanged, so other tools can annotate records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Primary lookup name.
    pub name: String,
    /// Owning team or person.
    pub owner: String,
    /// Display label of the chat room to ask in.
    pub room: String,
    /// Link to the chat room.
    pub url: String,
    /// Alternate lookup names, in the order they were supplied.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Unrecognised keys of the stored record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceRecord {
    /// Build a record from its parts.
    ///
    /// # Examples
    /// ```
    /// use ownerbot::domain::ServiceRecord;
    ///
    /// let record = ServiceRecord::new("Jira", "Dev Tools", "Help", "https://x", ["tickets"]);
    /// assert!(record.matches("TICKETS"));
    /// ```
    pub fn new<I, A>(
        name: impl Into<String>,
        owner: impl Into<String>,
        room: impl Into<String>,
        url: impl Into<String>,
        aliases: I,
    ) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            name: name.into(),
            owner: owner.into(),
            room: room.into(),
            url: url.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        }
    }

    /// True when `name` equals this record's name, ignoring case.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        eq_ignore_case(&self.name, name)
    }

    /// True when `name_or_alias` equals the name or any alias, ignoring case.
    #[must_use]
    pub fn matches(&self, name_or_alias: &str) -> bool {
        self.has_name(name_or_alias)
            || self
                .aliases
                .iter()
                .any(|alias| eq_ignore_case(alias, name_or_alias))
    }
}

/// The persisted aggregate: every service plus a version counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDocument {
    /// Records in insertion order.
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    /// Bumped by one on every persisted mutation; never checked on write.
    #[serde(default = "initial_version", deserialize_with = "version_or_initial")]
    pub version: u64,
}

impl Default for DirectoryDocument {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            version: INITIAL_VERSION,
        }
    }
}

impl DirectoryDocument {
    /// Parse a stored document.
    ///
    /// # Errors
    /// Returns the underlying [`serde_json::Error`] when `json` is not a
    /// directory document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Compact JSON used for storage.
    ///
    /// # Errors
    /// Propagates serialisation failures from `serde_json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty JSON (two-space indent) used for the `export` command.
    ///
    /// # Errors
    /// Propagates serialisation failures from `serde_json`.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// All service names sorted ascending with [`compare_names`].
    #[must_use]
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .services
            .iter()
            .map(|service| service.name.clone())
            .collect();
        names.sort_by(|a, b| compare_names(a, b));
        names
    }
}

/// Human-friendly ordering for service names.
///
/// Comparison runs in three passes, each only breaking ties of the previous:
/// base letters with accents and case folded away, then accents (unaccented
/// first), then case (lowercase first). So `"apm" < "APM" < "Bitbucket"` and
/// `"Eclair" < "Éclair" < "Zebra"`.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a, true)
        .cmp(&fold(b, true))
        .then_with(|| fold(a, false).cmp(&fold(b, false)))
        .then_with(|| b.cmp(a))
}

// Lowercased canonical decomposition, optionally without combining marks.
fn fold(name: &str, strip_marks: bool) -> String {
    name.nfd()
        .filter(|c| !(strip_marks && is_combining_mark(*c)))
        .flat_map(char::to_lowercase)
        .collect()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

const fn initial_version() -> u64 {
    INITIAL_VERSION
}

fn version_or_initial<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let version = Option::<u64>::deserialize(deserializer)?;
    Ok(version
        .filter(|value| *value != 0)
        .unwrap_or(INITIAL_VERSION))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Jira", true)]
    #[case("JIRA", true)]
    #[case("tickets", true)]
    #[case("Tickets", true)]
    #[case("jir", false)]
    fn matches_name_or_alias_ignoring_case(#[case] query: &str, #[case] expected: bool) {
        let record = ServiceRecord::new("Jira", "Dev Tools", "Help", "https://x", ["tickets"]);
        assert_eq!(record.matches(query), expected);
    }

    #[rstest]
    fn has_name_ignores_aliases() {
        let record = ServiceRecord::new("Jira", "Dev Tools", "Help", "https://x", ["tickets"]);
        assert!(record.has_name("jira"));
        assert!(!record.has_name("tickets"));
    }

    #[rstest]
    #[case(r#"{"services":[]}"#, 1)]
    #[case(r#"{"services":[],"version":null}"#, 1)]
    #[case(r#"{"services":[],"version":0}"#, 1)]
    #[case(r#"{"services":[],"version":12}"#, 12)]
    fn version_defaults_to_one(#[case] json: &str, #[case] expected: u64) {
        let document = DirectoryDocument::from_json(json).expect("document parses");
        assert_eq!(document.version, expected);
    }

    #[rstest]
    fn unknown_record_keys_survive_a_round_trip() {
        let json = r#"{"services":[{"name":"a","owner":"b","room":"c","url":"d","aliases":[],"tier":1,"oncall":{"team":"sre"}}],"version":2}"#;
        let document = DirectoryDocument::from_json(json).expect("document parses");
        let record = document.services.first().expect("one record");
        assert_eq!(record.extra.get("tier"), Some(&Value::from(1)));

        let written: Value =
            serde_json::from_str(&document.to_json().expect("serialises")).expect("valid json");
        let original: Value = serde_json::from_str(json).expect("valid json");
        assert_eq!(written, original);
    }

    #[rstest]
    fn record_without_aliases_loads_with_empty_list() {
        let document = DirectoryDocument::from_json(
            r#"{"services":[{"name":"a","owner":"b","room":"c","url":"d"}],"version":2}"#,
        )
        .expect("document parses");
        let record = document.services.first().expect("one record");
        assert!(record.aliases.is_empty());
    }

    #[rstest]
    fn pretty_json_uses_two_space_indent_in_field_order() {
        let document = DirectoryDocument {
            services: vec![ServiceRecord::new("a", "b", "c", "d", ["e"])],
            version: 3,
        };
        let expected = concat!(
            "{\n",
            "  \"services\": [\n",
            "    {\n",
            "      \"name\": \"a\",\n",
            "      \"owner\": \"b\",\n",
            "      \"room\": \"c\",\n",
            "      \"url\": \"d\",\n",
            "      \"aliases\": [\n",
            "        \"e\"\n",
            "      ]\n",
            "    }\n",
            "  ],\n",
            "  \"version\": 3\n",
            "}"
        );
        assert_eq!(document.to_pretty_json().expect("serialises"), expected);
    }

    #[rstest]
    fn sorted_names_ignore_case_and_put_lowercase_first() {
        let document = DirectoryDocument {
            services: vec![
                ServiceRecord::new("kibana", "o", "r", "u", Vec::<String>::new()),
                ServiceRecord::new("APM", "o", "r", "u", Vec::<String>::new()),
                ServiceRecord::new("Bitbucket", "o", "r", "u", Vec::<String>::new()),
                ServiceRecord::new("apm", "o", "r", "u", Vec::<String>::new()),
            ],
            version: 1,
        };
        assert_eq!(
            document.sorted_names(),
            vec!["apm", "APM", "Bitbucket", "kibana"]
        );
    }

    #[rstest]
    #[case("Éclair", "Zebra", Ordering::Less)]
    #[case("Eclair", "Éclair", Ordering::Less)]
    #[case("éclair", "Eclairs", Ordering::Less)]
    #[case("Ångström", "Apm", Ordering::Less)]
    #[case("ninja", "Ninja", Ordering::Less)]
    fn accented_names_sort_by_base_letter(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_names(a, b), expected);
    }
}
