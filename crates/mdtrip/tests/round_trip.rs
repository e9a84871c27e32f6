//! Byte-fidelity round trips for unedited documents

use mdtrip::{parse_markdown, standard_set, Backend, ParserOptions};
use test_case::test_case;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn round_trip(src: &str, backend: Backend) {
    init_logging();
    let doc = parse_markdown(src, backend, &ParserOptions::default(), &standard_set()).unwrap();
    let out = mdtrip::render_markdown(&doc).unwrap();
    assert_eq!(out, src, "{backend:?} round trip changed bytes");
}

/// Same fidelity check, but force the renderer off the whole-document
/// fast path: a dirty root with clean children must reassemble the
/// source from block slices and inter-block gaps.
fn round_trip_reassembled(src: &str) {
    init_logging();
    let mut doc =
        parse_markdown(src, Backend::Pulldown, &ParserOptions::default(), &standard_set())
            .unwrap();
    doc.mark_dirty();
    let out = mdtrip::render_markdown(&doc).unwrap();
    assert_eq!(out, src, "reassembly from spans changed bytes");
}

#[test_case("# Heading\n" ; "atx heading")]
#[test_case("### Deep heading ###\n" ; "closed atx heading")]
#[test_case("Title\n=====\n\nSub\n---\n" ; "setext headings")]
#[test_case("plain paragraph\n" ; "paragraph")]
#[test_case("one *em* two _em_ three **strong** four __strong__\n" ; "emphasis variants")]
#[test_case("`code` and ``code with ` tick``\n" ; "inline code")]
#[test_case("[text](https://example.com) and <https://example.com>\n" ; "links")]
#[test_case("[titled](x.md \"a title\")\n" ; "link title")]
#[test_case("![alt text](img.png)\n" ; "image")]
#[test_case("- a\n- b\n" ; "tight bullet list")]
#[test_case("*  Item 1\n*  Item 2\n" ; "wide markers")]
#[test_case("+ plus\n+ signs\n" ; "plus bullets")]
#[test_case("1. one\n2. two\n" ; "ordered list")]
#[test_case("3) three\n4) four\n" ; "paren ordered list")]
#[test_case("- a\n\n- b\n" ; "loose list")]
#[test_case("- outer\n  - inner\n  - inner 2\n" ; "nested list")]
#[test_case("1. step\n\n   continued paragraph\n" ; "item continuation")]
#[test_case("> quote\n" ; "blockquote")]
#[test_case("> outer\n> > inner\n" ; "nested blockquote")]
#[test_case("```\ncode\n```\n" ; "plain fence")]
#[test_case("```rust\nfn x() {}\n```\n" ; "info fence")]
#[test_case("~~~~text\ntildes\n~~~~\n" ; "tilde fence")]
#[test_case("> ```\n> quoted code\n> ```\n" ; "fence in blockquote")]
#[test_case("    indented code\n    second line\n" ; "indented code")]
#[test_case("---\n" ; "thematic break")]
#[test_case("***\n\ntext\n\n_____\n" ; "break variants")]
#[test_case("<div>\n<p>html</p>\n</div>\n" ; "html block")]
#[test_case("text with <b>inline html</b> here\n" ; "inline html")]
#[test_case("line one\nline two\n" ; "soft break")]
#[test_case("hard  \nbreak\n" ; "hard break spaces")]
#[test_case("escaped \\* star and \\[bracket\\]\n" ; "escapes")]
#[test_case("~~struck~~\n" ; "strikethrough")]
#[test_case("Press ++Ctrl+C++ to stop.\n" ; "kbd syntax")]
#[test_case("no trailing newline" ; "no trailing newline")]
#[test_case("\n\nleading blanks\n" ; "leading blank lines")]
#[test_case("# One\n\n\n\n# Two\n" ; "extra blank separators")]
fn pulldown_round_trip(src: &str) {
    round_trip(src, Backend::Pulldown);
    round_trip_reassembled(src);
}

#[test_case("| a | b |\n|---|:-:|\n| 1 | 2 |\n" ; "table")]
#[test_case("| odd | spacing   |\n| --- | --------- |\n| 1   | 2         |\n" ; "padded table")]
#[test_case("- [x] done\n- [ ] open\n" ; "task list")]
#[test_case("# With id {#custom-anchor}\n" ; "heading attribute")]
fn pulldown_only_round_trip(src: &str) {
    round_trip(src, Backend::Pulldown);
    round_trip_reassembled(src);
}

#[test_case("# Heading\n" ; "atx heading")]
#[test_case("Title\n=====\n" ; "setext heading")]
#[test_case("one *em* and **strong**\n" ; "emphasis")]
#[test_case("`code`\n" ; "inline code")]
#[test_case("[text](https://example.com)\n" ; "link")]
#[test_case("- a\n- b\n" ; "tight list")]
#[test_case("1. one\n2. two\n" ; "ordered list")]
#[test_case("> quote\n" ; "blockquote")]
#[test_case("```rust\nfn x() {}\n```\n" ; "fence")]
#[test_case("---\n" ; "thematic break")]
#[test_case("~~struck~~\n" ; "strikethrough")]
#[test_case("not \\*emphasis\\*\n" ; "escapes")]
fn markdown_it_round_trip(src: &str) {
    round_trip(src, Backend::MarkdownIt);
}

#[test]
fn backends_agree_on_tree_shape() {
    let src = "# Title\n\nPara with *em*.\n\n- a\n- b\n";
    let opts = ParserOptions::default();
    let exts = standard_set();
    let a = parse_markdown(src, Backend::Pulldown, &opts, &exts).unwrap();
    let b = parse_markdown(src, Backend::MarkdownIt, &opts, &exts).unwrap();
    assert_eq!(mdtrip::render_json(&a).unwrap(), mdtrip::render_json(&b).unwrap());
}

#[test]
fn canonical_output_is_a_fixed_point() {
    // fully canonical text must reparse into a tree that renders
    // identically
    let canonical = "# Fresh {#fresh}\n\nBuilt **by hand** with `code`.\n\n- only item\n";
    let doc = mdtrip::parse(canonical).unwrap();
    assert_eq!(mdtrip::render_markdown(&doc).unwrap(), canonical);

    let mut reparsed = mdtrip::parse(canonical).unwrap();
    reparsed.mark_dirty();
    assert_eq!(mdtrip::render_markdown(&reparsed).unwrap(), canonical);
}
