#[cfg(test)]
mod tests {
    use crate::tools::containers::*;
    use scraper::Html;

    fn people_patterns() -> Vec<ContainerPattern> {
        vec![
            ContainerPattern::new("ul[role='list'] > li").has("div[class='mb1'] a"),
            ContainerPattern::new("div[componentkey]").has("a[href*='/in/']"),
            ContainerPattern::new("li").has("a[href*='/in/']"),
        ]
    }

    fn anchors_fallback() -> FallbackRule {
        FallbackRule::new("a[href*='/in/']", "li")
    }

    #[test]
    fn test_first_pattern_with_matches_is_used_wholesale() {
        // Both the first and the last pattern match, but only the first is used.
        let html = r#"
            <ul role="list">
              <li><div class="mb1"><a href="/in/a/">A</a></div></li>
              <li><div class="mb1"><a href="/in/b/">B</a></div></li>
            </ul>
            <ol><li><a href="/in/c/">C</a></li></ol>
        "#;
        let doc = Html::parse_document(html);
        let set = locate_containers(&doc, &people_patterns(), Some(&anchors_fallback()));
        assert_eq!(set.len(), 2);
        assert!(!set.is_fallback);
        assert_eq!(
            set.strategy.as_deref(),
            Some("ul[role='list'] > li :has(div[class='mb1'] a)")
        );
    }

    #[test]
    fn test_has_filter_skips_items_without_required_descendant() {
        let html = r#"
            <div componentkey="x1"><a href="/company/acme/">Acme</a></div>
            <div componentkey="x2"><a href="/in/grace/">Grace</a></div>
        "#;
        let doc = Html::parse_document(html);
        let set = locate_containers(&doc, &people_patterns(), None);
        assert_eq!(set.len(), 1);
        assert_eq!(set.containers[0].element().value().attr("componentkey"), Some("x2"));
    }

    #[test]
    fn test_fallback_infers_containers_from_anchors() {
        let html = r#"
            <section>
              <li class="card"><span><a href="/in/a/">A</a> <a href="/in/a/detail">more</a></span></li>
              <li class="card"><a href="/in/b/">B</a></li>
            </section>
        "#;
        let doc = Html::parse_document(html);
        // None of these patterns can match.
        let patterns = vec![
            ContainerPattern::new("ul[role='list'] > li").has("div[class='mb1'] a"),
            ContainerPattern::new("div[componentkey]"),
        ];
        let set = locate_containers(&doc, &patterns, Some(&anchors_fallback()));
        assert!(set.is_fallback);
        assert_eq!(set.strategy.as_deref(), Some(FALLBACK_STRATEGY));
        // Two anchors share the first <li>; ancestors are deduplicated.
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_fallback_is_capped() {
        let items: String = (0..80)
            .map(|i| format!(r#"<li><a href="/in/p{i}/">P{i}</a></li>"#))
            .collect();
        let html = format!("<div>{items}</div>");
        let doc = Html::parse_document(&html);
        let set = locate_containers(&doc, &[ContainerPattern::new("article")], Some(&anchors_fallback()));
        assert!(set.is_fallback);
        assert_eq!(set.len(), 50);

        let mut tight = anchors_fallback();
        tight.cap = 5;
        let set = locate_containers(&doc, &[], Some(&tight));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_nothing_found() {
        let doc = Html::parse_document("<p>No results</p>");
        let set = locate_containers(&doc, &people_patterns(), Some(&anchors_fallback()));
        assert!(set.is_empty());
        assert!(set.strategy.is_none());
        assert!(!set.is_fallback);
    }

    #[test]
    fn test_malformed_pattern_is_skipped() {
        let doc = Html::parse_document(r#"<li><a href="/in/a/">A</a></li>"#);
        let patterns = vec![ContainerPattern::new("li[[["), ContainerPattern::new("li")];
        let set = locate_containers(&doc, &patterns, None);
        assert_eq!(set.len(), 1);
        assert_eq!(set.strategy.as_deref(), Some("li"));
    }

    #[test]
    fn test_container_key_prefers_stable_attributes() {
        let html = r#"
            <div class="r" componentkey="abc"><a href="/in/a/">A</a></div>
            <div class="r"><a href="/in/b/">B</a></div>
            <div class="r"><a href="/in/b/">B</a></div>
        "#;
        let doc = Html::parse_document(html);
        let set = locate_containers(&doc, &[ContainerPattern::new("div.r")], None);
        assert_eq!(set.len(), 3);
        assert_eq!(set.containers[0].key().0, "componentkey=abc");
        assert!(set.containers[1].key().0.starts_with("h_"));
        // Identical markup hashes identically, across snapshots too.
        assert_eq!(set.containers[1].key(), set.containers[2].key());
        let again = Html::parse_document(html);
        let set2 = locate_containers(&again, &[ContainerPattern::new("div.r")], None);
        assert_eq!(set.containers[1].key(), set2.containers[1].key());
    }
}
