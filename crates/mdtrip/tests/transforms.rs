//! Transformer pipeline over parsed documents

use mdtrip::{
    parse, render_markdown, IdGenerator, NormalizeHeadings, Pipeline, ShiftHeadings,
    TocGenerator, Transform,
};

#[test]
fn id_generation_only_reformats_headings() {
    let src = "# Getting Started\n\nSome   prose.\n\n## Getting Started\n";
    let mut doc = parse(src).unwrap();
    Pipeline::new()
        .with(Box::new(IdGenerator::new()))
        .run(&mut doc)
        .unwrap();

    assert_eq!(
        render_markdown(&doc).unwrap(),
        "# Getting Started {#getting-started}\n\nSome   prose.\n\n## Getting Started {#getting-started-1}\n"
    );
}

#[test]
fn toc_marker_is_replaced_with_links() {
    let src = "# Guide\n\n[[TOC]]\n\n## Install\n\n## Usage\n";
    let mut doc = parse(src).unwrap();
    Pipeline::new()
        .with(Box::new(IdGenerator::new()))
        .with(Box::new(TocGenerator::new()))
        .run(&mut doc)
        .unwrap();

    let out = render_markdown(&doc).unwrap();
    assert_eq!(
        out,
        "# Guide {#guide}\n\n- [Guide](#guide)\n  - [Install](#install)\n  - [Usage](#usage)\n\n## Install {#install}\n\n## Usage {#usage}\n"
    );
}

#[test]
fn shift_then_normalize() {
    let src = "## A\n\n#### B\n";
    let mut doc = parse(src).unwrap();
    Pipeline::new()
        .with(Box::new(ShiftHeadings::decrease(1)))
        .with(Box::new(NormalizeHeadings))
        .run(&mut doc)
        .unwrap();

    assert_eq!(doc.child(0).unwrap().level(), Some(1));
    assert_eq!(doc.child(1).unwrap().level(), Some(2));
    assert_eq!(render_markdown(&doc).unwrap(), "# A\n\n## B\n");
}

#[test]
fn pipeline_is_reusable_across_documents() {
    let pipeline = Pipeline::new().with(Box::new(IdGenerator::new()));
    for src in ["# One\n", "# Two\n"] {
        let mut doc = parse(src).unwrap();
        pipeline.run(&mut doc).unwrap();
        assert!(doc.child(0).unwrap().attr("id").is_some());
    }
}

#[test]
fn untouched_documents_stay_byte_identical_through_an_empty_pipeline() {
    let src = "*  quirky\n*  spacing\n";
    let mut doc = parse(src).unwrap();
    Pipeline::new().run(&mut doc).unwrap();
    assert_eq!(render_markdown(&doc).unwrap(), src);
}
