#[cfg(test)]
mod tests {
    use crate::tools::assemble::*;
    use crate::tools::containers::{locate_containers, ContainerPattern};
    use crate::tools::extract::{FieldSpec, Locator, TextMatch};
    use crate::tools::types::{string_hash, Fingerprint};
    use chrono::{TimeZone, Utc};
    use scraper::Html;
    use url::Url;

    fn schema() -> RecordSchema {
        RecordSchema {
            fields: vec![
                FieldSpec::text("name", vec![Locator::css("a.name span"), Locator::css("a.name")]),
                FieldSpec::link("profileUrl", vec![Locator::css("a.name")]),
                FieldSpec::text("jobTitle", vec![Locator::css(".title")]),
                FieldSpec::text("location", vec![Locator::css(".loc")]),
                FieldSpec::text(
                    "currentTitle",
                    vec![TextMatch::new("p", "Current:").starts_with().into()],
                ),
                FieldSpec::text(
                    "followers",
                    vec![TextMatch::new("span", "followers").ignore_case().into()],
                ),
            ],
            identity: vec![
                "name".into(),
                "profileUrl".into(),
                "jobTitle".into(),
                "location".into(),
                "currentTitle".into(),
            ],
            status: Some(StatusRule::default()),
            observed_at_field: "statusObservedAt".into(),
        }
    }

    fn base() -> Url {
        Url::parse("https://www.example.com/search/").unwrap()
    }

    fn records(html: &str) -> Vec<Option<Record>> {
        let doc = Html::parse_document(html);
        let set = locate_containers(&doc, &[ContainerPattern::new("li")], None);
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 15, 2).unwrap();
        set.containers
            .iter()
            .map(|c| assemble_at(c, &schema(), Some(&base()), at))
            .collect()
    }

    #[test]
    fn test_hash_matches_reference_values() {
        assert_eq!(string_hash("a"), 0x61);
        assert_eq!(string_hash("ab"), 0xc21);
        // Astral characters hash as two UTF-16 units.
        assert_eq!(string_hash("😀"), 0x1b0d63);
        assert_eq!(
            Fingerprint::of(&["Ada Lovelace", "https://www.example.com/in/ada/", "Analyst", "London", ""]).0,
            "p_db09baa0"
        );
    }

    #[test]
    fn test_assembles_fields_in_column_order() {
        let out = records(
            r#"<ul><li>
                <a class="name" href="/in/ada/"><span>Ada Lovelace</span></a>
                <div class="title">Analyst</div><div class="loc">London</div>
                <span>312 followers</span>
            </li></ul>"#,
        );
        let rec = out[0].as_ref().unwrap();
        let cols: Vec<&str> = rec.columns().collect();
        assert_eq!(
            cols,
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
        assert_eq!(rec.get("profileUrl"), Some("https://www.example.com/in/ada/"));
        assert_eq!(rec.get("followers"), Some("312 followers"));
        assert_eq!(rec.get("status"), Some("offline"));
        assert_eq!(rec.get("statusObservedAt"), Some("2026-10-18T09:15:02.000Z"));
        assert_eq!(rec.fingerprint().0, "p_db09baa0");
    }

    #[test]
    fn test_status_priority_online_before_reachable() {
        let out = records(
            r#"<ul>
              <li><a class="name" href="/in/a/">A</a><span>Status is reachable</span><span>Status is online</span></li>
              <li><a class="name" href="/in/b/">B</a><span>Status is reachable</span></li>
              <li><a class="name" href="/in/c/">C</a></li>
            </ul>"#,
        );
        let statuses: Vec<Option<Status>> = out.iter().map(|r| r.as_ref().unwrap().status()).collect();
        assert_eq!(
            statuses,
            vec![Some(Status::Online), Some(Status::Reachable), Some(Status::Offline)]
        );
    }

    #[test]
    fn test_fingerprint_ignores_status_and_time() {
        let html_offline = r#"<ul><li><a class="name" href="/in/ada/">Ada</a><div class="title">Analyst</div></li></ul>"#;
        let html_online = r#"<ul><li><a class="name" href="/in/ada/">Ada</a><div class="title">Analyst</div><span>Status is online</span></li></ul>"#;

        let doc1 = Html::parse_document(html_offline);
        let doc2 = Html::parse_document(html_online);
        let c1 = locate_containers(&doc1, &[ContainerPattern::new("li")], None);
        let c2 = locate_containers(&doc2, &[ContainerPattern::new("li")], None);

        let r1 = assemble_at(&c1.containers[0], &schema(), None, Utc.timestamp_opt(0, 0).unwrap()).unwrap();
        let r2 = assemble(&c2.containers[0], &schema(), None).unwrap();

        assert_ne!(r1.status(), r2.status());
        assert_ne!(r1.observed_at(), r2.observed_at());
        assert_eq!(r1.fingerprint(), r2.fingerprint());
    }

    #[test]
    fn test_empty_identity_is_discarded() {
        // Only a non-identity field is present.
        let out = records(r#"<ul><li><span>90 followers</span></li></ul>"#);
        assert!(out[0].is_none());
    }

    #[test]
    fn test_record_serializes_flat_without_fingerprint() {
        let out = records(r#"<ul><li><a class="name" href="/in/ada/">Ada</a></li></ul>"#);
        let rec = out[0].as_ref().unwrap();
        let json = serde_json::to_string(rec).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Ada","profileUrl":"https://www.example.com/in/ada/","jobTitle":"","location":"","currentTitle":"","followers":"","status":"offline","statusObservedAt":"2026-10-18T09:15:02.000Z"}"#
        );
    }

    #[test]
    fn test_schema_without_status_has_no_status_column() {
        let mut s = schema();
        s.status = None;
        s.observed_at_field = "observedAt".into();
        assert_eq!(
            s.columns(),
            vec!["name", "profileUrl", "jobTitle", "location", "currentTitle", "followers", "observedAt"]
        );
    }
}
