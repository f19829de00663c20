#[cfg(test)]
mod tests {
    use crate::tools::extract::*;
    use scraper::Html;
    use url::Url;

    const PERSON: &str = r#"
        <html><body><ul role="list">
          <li>
            <div class="mb1">
              <a href="/in/ada-lovelace/"><span aria-hidden="true"> Ada Lovelace </span><span class="visually-hidden">View profile</span></a>
              <div>Connection</div>
              <div>Analyst at Engines Ltd</div>
              <div>London</div>
            </div>
            <p class="summary">Current: Chief Analyst</p>
            <p><a href="/followers">1,204 Followers</a></p>
          </li>
        </ul></body></html>
    "#;

    fn first_li(doc: &Html) -> scraper::ElementRef<'_> {
        let sel = scraper::Selector::parse("li").unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn test_first_non_empty_locator_wins() {
        let doc = Html::parse_document(PERSON);
        let li = first_li(&doc);
        let chain = vec![
            Locator::css("div.missing span"),
            Locator::css("div[class='mb1'] a span[aria-hidden='true']"),
            Locator::css("div[class='mb1'] a"),
        ];
        assert_eq!(extract_text(&chain, li), "Ada Lovelace");
    }

    #[test]
    fn test_malformed_locator_is_soft_miss() {
        let doc = Html::parse_document(PERSON);
        let li = first_li(&doc);
        let chain = vec![
            Locator::css("div[[[class"),
            Locator::css("div[class='mb1'] > div:nth-of-type(3)"),
        ];
        assert_eq!(extract_text(&chain, li), "London");
    }

    #[test]
    fn test_exhausted_chain_is_empty() {
        let doc = Html::parse_document(PERSON);
        let li = first_li(&doc);
        let chain = vec![Locator::css("table"), Locator::css("::bogus")];
        assert_eq!(extract_text(&chain, li), "");
    }

    #[test]
    fn test_link_is_resolved_against_page_url() {
        let doc = Html::parse_document(PERSON);
        let li = first_li(&doc);
        let base = Url::parse("https://www.example.com/search/results/people/?q=ada").unwrap();
        let chain = vec![Locator::css("div[class='mb1'] a")];
        assert_eq!(
            extract_link(&chain, li, Some(&base)),
            "https://www.example.com/in/ada-lovelace/"
        );
        // No page URL: keep the raw attribute.
        assert_eq!(extract_link(&chain, li, None), "/in/ada-lovelace/");
    }

    #[test]
    fn test_text_match_starts_with_and_ignore_case() {
        let doc = Html::parse_document(PERSON);
        let li = first_li(&doc);

        let current: Locator = TextMatch::new("p", "Current:").starts_with().into();
        assert_eq!(extract_text(&[current], li), "Current: Chief Analyst");

        let followers: Locator = TextMatch::new("a", "followers").ignore_case().into();
        assert_eq!(extract_text(&[followers], li), "1,204 Followers");

        let case_sensitive: Locator = TextMatch::new("a", "followers").into();
        assert_eq!(extract_text(&[case_sensitive], li), "");
    }

    #[test]
    fn test_text_match_descend() {
        let doc = Html::parse_document(PERSON);
        let li = first_li(&doc);
        let loc: Locator = TextMatch::new("p", "followers").ignore_case().descend("a").into();
        let el = loc.try_match(li).unwrap();
        assert_eq!(el.value().name(), "a");
    }

    #[test]
    fn test_sibling_locator_walks_from_anchor() {
        let html = r#"
            <div componentkey="k1">
              <p><a data-view-name="search-result-lockup-title" href="/in/grace/">Grace Hopper</a></p>
              <p>Rear Admiral</p>
              <p>Arlington, VA</p>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let sel = scraper::Selector::parse("div[componentkey]").unwrap();
        let root = doc.select(&sel).next().unwrap();

        let title = Locator::sibling("a[data-view-name='search-result-lockup-title']", "p", "p", 1);
        let location = Locator::sibling("a[data-view-name='search-result-lockup-title']", "p", "p", 2);
        let beyond = Locator::sibling("a[data-view-name='search-result-lockup-title']", "p", "p", 3);

        assert_eq!(extract_text(&[title], root), "Rear Admiral");
        assert_eq!(extract_text(&[location], root), "Arlington, VA");
        assert_eq!(extract_text(&[beyond], root), "");
    }

    #[test]
    fn test_find_first_where_skips_rejected_candidates() {
        let html = r#"
            <div>
              <button class="next" disabled>Next</button>
              <button class="next">Next</button>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let chain = vec![Locator::css("button.next")];
        let hit = find_first_where(&chain, doc.root_element(), is_enabled).unwrap();
        assert!(hit.value().attr("disabled").is_none());

        let none = find_first_where(&chain, doc.root_element(), |_| false);
        assert!(none.is_none());
    }

    #[test]
    fn test_locator_json_shape() {
        let chain: LocatorChain = serde_json::from_str(
            r#"[
                {"kind":"css","css":"div.mb1 a"},
                {"kind":"text","css":"p","needle":"Current:","mode":"starts_with"},
                {"kind":"sibling","anchor":"a","ancestor":"p","sibling":"p","nth":2}
            ]"#,
        )
        .unwrap();
        assert_eq!(chain[0], Locator::css("div.mb1 a"));
        assert_eq!(chain[1], TextMatch::new("p", "Current:").starts_with().into());
        assert_eq!(chain[2], Locator::sibling("a", "p", "p", 2));
    }
}
