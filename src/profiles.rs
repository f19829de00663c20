//! Built-in extraction profiles
//!
//! A profile is everything the engine knows about one result type: where
//! containers live, how each field is read, and how to ask for more.
//! Locator order encodes specificity; the current markup comes first and
//! legacy layouts trail as broad fallbacks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::tools::assemble::{RecordSchema, StatusRule};
use crate::tools::containers::{ContainerPattern, FallbackRule};
use crate::tools::extract::{FieldSpec, Locator, TextMatch};
use crate::tools::paginate::PaginationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    People,
    Posts,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub containers: Vec<ContainerPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackRule>,
    pub schema: RecordSchema,
    pub pagination: PaginationConfig,
    pub default_limit: usize,
}

const PROFILE_LINK: &str = "a[href*='/in/']";
const LOCKUP_TITLE: &str = "a[data-view-name='search-result-lockup-title']";

impl Profile {
    pub fn builtin(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::People => Self::people(),
            ProfileKind::Posts => Self::posts(),
        }
    }

    /// People search results.
    pub fn people() -> Self {
        let fields = vec![
            FieldSpec::text(
                "name",
                vec![
                    Locator::css("div[class='mb1'] a span[aria-hidden='true']"),
                    Locator::css("div[class='mb1'] a"),
                    Locator::css("a[href*='/in/'][data-view-name]"),
                    Locator::css(LOCKUP_TITLE),
                    Locator::css(PROFILE_LINK),
                ],
            ),
            FieldSpec::link(
                "profileUrl",
                vec![
                    Locator::css("div[class='mb1'] a"),
                    Locator::css("a[href*='/in/'][data-view-name]"),
                    Locator::css(LOCKUP_TITLE),
                    Locator::css(PROFILE_LINK),
                ],
            ),
            FieldSpec::text(
                "jobTitle",
                vec![
                    Locator::css("div[class='mb1'] > div:nth-of-type(2)"),
                    Locator::sibling(LOCKUP_TITLE, "p", "p", 1),
                    Locator::sibling(PROFILE_LINK, "p", "p", 1),
                    Locator::css("p.t-14.t-black:first-of-type"),
                ],
            ),
            FieldSpec::text(
                "location",
                vec![
                    Locator::css("div[class='mb1'] > div:nth-of-type(3)"),
                    Locator::sibling(LOCKUP_TITLE, "p", "p", 2),
                    Locator::sibling(PROFILE_LINK, "p", "p", 2),
                    Locator::css("p[class*='entity-result__secondary-subtitle']"),
                ],
            ),
            FieldSpec::text(
                "currentTitle",
                vec![
                    TextMatch::new("p", "Current:").starts_with().into(),
                    TextMatch::new("p", "Current:").into(),
                    Locator::css("p[class*='entity-result__summary--2-lines']"),
                ],
            ),
            FieldSpec::text(
                "followers",
                vec![
                    TextMatch::new("a", "followers").ignore_case().into(),
                    TextMatch::new("p", "followers").ignore_case().descend("a").into(),
                    TextMatch::new("p", "followers").ignore_case().into(),
                    TextMatch::new("span", "followers").ignore_case().into(),
                    TextMatch::new("a", "followers").into(),
                    TextMatch::new("span", "followers").into(),
                ],
            ),
        ];

        Self {
            name: "people".into(),
            containers: vec![
                ContainerPattern::new("ul[role='list'] > li").has("div[class='mb1'] a"),
                ContainerPattern::new("div[componentkey]").has(LOCKUP_TITLE),
                ContainerPattern::new("div[componentkey]").has(PROFILE_LINK),
                ContainerPattern::new("li.reusable-search__result-container").has(PROFILE_LINK),
                ContainerPattern::new("li[class*='search']").has(PROFILE_LINK),
                ContainerPattern::new("li").has(PROFILE_LINK),
            ],
            fallback: Some(FallbackRule::new(PROFILE_LINK, "li")),
            schema: RecordSchema {
                fields,
                identity: vec![
                    "name".into(),
                    "profileUrl".into(),
                    "jobTitle".into(),
                    "location".into(),
                    "currentTitle".into(),
                ],
                status: Some(StatusRule::default()),
                observed_at_field: "statusObservedAt".into(),
            },
            pagination: PaginationConfig {
                affordances: vec![
                    Locator::css("button.artdeco-pagination__button--next"),
                    Locator::css("button[aria-label='Next']"),
                    Locator::css("button[aria-label='Next page']"),
                    Locator::css("button[data-testid='pagination-control-next-btn']"),
                ],
                wait_ms: 1600,
                settle_split: 0.5,
                nudge_px: 600,
            },
            default_limit: 50,
        }
    }

    /// Feed posts.
    pub fn posts() -> Self {
        const ACTOR_META: &str = "div[class*='update-components-actor__meta']";

        let fields = vec![
            FieldSpec::text(
                "authorName",
                vec![Locator::css(&format!(
                    "{ACTOR_META} span[class*='update-components-actor__title'] span[dir='ltr'] > span[aria-hidden='true']"
                ))],
            ),
            FieldSpec::link(
                "authorUrl",
                vec![Locator::css(&format!(
                    "{ACTOR_META} a[class*='update-components-actor__meta-link']"
                ))],
            ),
            FieldSpec::text(
                "authorTitle",
                vec![Locator::css(&format!(
                    "{ACTOR_META} span[class*='update-components-actor__description']"
                ))],
            ),
            FieldSpec::text(
                "postContent",
                vec![Locator::css(
                    "div[class*='update-components-text'][class*='update-components-update-v2__commentary']",
                )],
            ),
        ];

        Self {
            name: "posts".into(),
            containers: vec![ContainerPattern::new("div.feed-shared-update-v2")],
            fallback: Some(FallbackRule::new(ACTOR_META, "div[data-urn]")),
            schema: RecordSchema {
                fields,
                identity: vec!["authorName".into(), "authorUrl".into(), "postContent".into()],
                status: None,
                observed_at_field: "observedAt".into(),
            },
            pagination: PaginationConfig {
                affordances: vec![
                    TextMatch::new("button", "Show more results").into(),
                    Locator::css("button.scaffold-finite-scroll__load-button, button.artdeco-button--full"),
                ],
                wait_ms: 1700,
                settle_split: 0.35,
                nudge_px: 400,
            },
            default_limit: 100,
        }
    }

    /// Load a profile from a JSON file and validate it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let profile: Profile = serde_json::from_str(&raw)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Structural checks only; selector syntax is checked lazily as a soft miss.
    pub fn validate(&self) -> Result<()> {
        if self.containers.is_empty() {
            return Err(ScrapeError::profile(format!("{}: no container patterns", self.name)));
        }
        if self.schema.identity.is_empty() {
            return Err(ScrapeError::profile(format!("{}: no identity fields", self.name)));
        }
        for id in &self.schema.identity {
            if !self.schema.fields.iter().any(|f| &f.name == id) {
                return Err(ScrapeError::profile(format!(
                    "{}: identity field `{id}` is not a declared field",
                    self.name
                )));
            }
        }
        let columns = self.schema.columns();
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].contains(c) {
                return Err(ScrapeError::profile(format!("{}: duplicate column `{c}`", self.name)));
            }
        }
        Ok(())
    }

    /// Output columns in export order.
    pub fn columns(&self) -> Vec<String> {
        self.schema.columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        Profile::people().validate().unwrap();
        Profile::posts().validate().unwrap();
    }

    #[test]
    fn test_people_columns_are_fixed() {
        assert_eq!(
            Profile::people().columns(),
            vec![
                "name",
                "profileUrl",
                "jobTitle",
                "location",
                "currentTitle",
                "followers",
                "status",
                "statusObservedAt"
            ]
        );
        assert_eq!(
            Profile::posts().columns(),
            vec!["authorName", "authorUrl", "authorTitle", "postContent", "observedAt"]
        );
    }

    #[test]
    fn test_profile_survives_json() {
        let json = serde_json::to_string_pretty(&Profile::people()).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Profile::people());
    }

    #[test]
    fn test_validate_rejects_unknown_identity_field() {
        let mut p = Profile::posts();
        p.schema.identity.push("likes".into());
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("likes"));
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let mut p = Profile::posts();
        p.schema.observed_at_field = "authorName".into();
        assert!(p.validate().is_err());
    }
}
