mod common;

use common::{doc, doc_of, el};
use filter_core::filter::{Condition, Filter};

fn product_page() -> Filter {
    doc(el("html")
        .uri("https://shop.example/p/3874749")
        .child(
            el("div").attr("class", "products").child(
                el("div")
                    .attr("class", "item")
                    .attr("id", "3874749")
                    .child(el("a").attr("href", "/de/google-pixel-3.html")),
            ),
        )
        .child(el("div").attr("class", "footer").text("imprint")))
}

#[test]
fn invariant_empty_propagates_through_any_path() {
    let empty = Filter::empty();
    for path in ["***.div", "***.div[class:'products']", "a.b.c", "***"] {
        assert!(empty.filter(path).is_empty());
    }
}

#[test]
fn invariant_is_empty_matches_size() {
    let page = product_page();
    assert_eq!(page.is_empty(), page.size() == 0);

    let none = page.filter("***.video");
    assert!(none.is_empty());
    assert_eq!(none.size(), 0);

    let some = page.filter("***.div");
    assert!(some.is_not_empty());
    assert_eq!(some.is_empty(), some.size() == 0);
}

#[test]
fn filter_merges_matches_of_every_top_level_element() {
    let two_roots = doc_of(vec![
        el("div").child(el("span").text("one")),
        el("div").child(el("span").text("two")),
    ]);
    let spans = two_roots.filter("***.span");
    assert_eq!(spans.size(), 2);
    assert_eq!(spans.all_text(false), vec!["one", "two"]);
}

#[test]
fn first_of_returns_first_non_empty_candidate() {
    let page = product_page();
    let found = page.first_of("***.video", &["***.audio", "***.a", "***.div"]);
    assert_eq!(found.attribute("href"), "/de/google-pixel-3.html");
}

#[test]
fn first_of_prefers_the_primary_path() {
    let page = product_page();
    let found = page.first_of("***.a", &["***.div"]);
    assert_eq!(found.size(), 1);
    assert_eq!(found.attribute("href"), "/de/google-pixel-3.html");
}

#[test]
fn first_of_all_empty_equals_the_last_alt_result() {
    let page = product_page();
    let found = page.first_of("***.video", &["***.audio", "***.canvas"]);
    assert_eq!(found, page.filter("***.canvas"));
    assert!(found.is_empty());
}

#[test]
fn first_where_returns_first_path_matching_the_condition() {
    let page = product_page();
    let imprint = Condition::text_contains("imprint", true);
    let found = page.first_where(
        &imprint,
        &["***.div[class:'products']", "***.div[class:'footer']"],
    );
    assert_eq!(found.attribute("class"), "footer");
}

#[test]
fn first_where_without_match_is_empty() {
    let page = product_page();
    let never = Condition::text_is("no such text");
    assert!(page
        .first_where(&never, &["***.div", "***.a"])
        .is_empty());
}

#[test]
fn get_is_bounds_checked() {
    let page = product_page();
    let divs = page.filter("***.div");
    assert_eq!(divs.size(), 3);
    assert!(divs.get(0).is_not_empty());
    assert!(divs.get(2).is_not_empty());
    assert!(divs.get(3).is_empty());
    assert!(divs.get(100).is_empty());
}

#[test]
fn first_and_last_are_safe_on_empty() {
    let empty = Filter::empty();
    assert!(empty.first().is_empty());
    assert!(empty.last().is_empty());

    let divs = product_page().filter("***.div");
    assert_eq!(divs.first().attribute("class"), "products");
    assert_eq!(divs.last().attribute("class"), "footer");
}

#[test]
fn invariant_children_come_from_the_first_element_only() {
    let two_roots = doc_of(vec![
        el("ul")
            .child(el("li").text("a"))
            .child(el("li").text("b")),
        el("ul").child(el("li").text("c")),
    ]);
    let children = two_roots.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].text(), "a");
    assert_eq!(children[1].text(), "b");
}

#[test]
fn children_of_empty_is_empty() {
    assert!(Filter::empty().children().is_empty());
}

#[test]
fn iterator_yields_single_element_filters_in_document_order() {
    let divs = product_page().filter("***.div");
    let sizes: Vec<usize> = divs.iter().map(|f| f.size()).collect();
    assert_eq!(sizes, vec![1, 1, 1]);

    let classes: Vec<String> = divs.iter().map(|f| f.attribute("class")).collect();
    assert_eq!(classes, vec!["products", "item", "footer"]);
}

#[test]
fn url_comes_from_the_first_element() {
    let page = product_page();
    assert_eq!(page.url(), "https://shop.example/p/3874749");
    assert_eq!(Filter::empty().url(), "");
}

#[test]
fn matches_delegates_to_the_condition() {
    let page = product_page();
    let products = page.filter("***.div[class:'products']");
    assert!(products.matches(&Condition::attribute_contains("class", "PROD").unwrap()));
    assert!(!products.matches(&Condition::text_is("imprint")));
}
