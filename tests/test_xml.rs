use insta::assert_snapshot;
use rstest::rstest;

use zpretty::{prettify, Dialect, Prettifier};

fn xml(source: &str) -> String {
    prettify(source, &Dialect::xml())
}

#[rstest]
#[case("<a><b/></a>", "<a><b /></a>\n")]
#[case("<a><b></b></a>", "<a><b /></a>\n")]
#[case("<a>\n<b/>\n</a>", "<a>\n  <b />\n</a>\n")]
#[case("<x:a xmlns:x=\"u\"><x:b/></x:a>", "<x:a xmlns:x=\"u\"><x:b /></x:a>\n")]
#[case("<a>  x  </a>", "<a>  x  </a>\n")]
#[case("<a>1 &lt; 2</a>", "<a>1 &lt; 2</a>\n")]
#[case("<a>a & b</a>", "<a>a &amp; b</a>\n")]
#[case("<a hidden=\"\"/>", "<a hidden=\"\" />\n")]
fn test_prettify(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(xml(source), expected);
}

#[test]
fn test_case_is_kept() {
    assert_eq!(
        xml("<Root><subElement/></Root>"),
        "<Root><subElement /></Root>\n"
    );
}

#[test]
fn test_statements_are_not_split() {
    assert_eq!(
        xml("<a tal:define=\"a 1; b 2\"/>"),
        "<a tal:define=\"a 1; b 2\" />\n"
    );
}

#[test]
fn test_namespace_declarations_come_first() {
    assert_eq!(
        xml("<a z=\"1\" xmlns=\"u\" b=\"2\"/>"),
        "<a xmlns=\"u\"\n   b=\"2\"\n   z=\"1\"\n/>\n"
    );
}

#[test]
fn test_declaration() {
    let source = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<a>\n  <b/>\n</a>";
    assert_eq!(
        xml(source),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<a>\n  <b />\n</a>\n"
    );
}

#[test]
fn test_declaration_is_added() {
    assert_eq!(
        xml("<?xml-stylesheet href=\"a\"?>\n<root/>"),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<?xml-stylesheet href=\"a\"?>\n<root />\n"
    );
}

#[test]
fn test_cdata_becomes_text() {
    assert_eq!(xml("<a><![CDATA[<x>]]></a>"), "<a>&lt;x&gt;</a>\n");
}

#[test]
fn test_cdata_preserved() {
    let mut dialect = Dialect::xml();
    dialect.preserve_cdata = true;
    assert_eq!(
        prettify("<a><![CDATA[<x>]]></a>", &dialect),
        "<a><![CDATA[<x>]]></a>\n"
    );
}

#[test]
fn test_recover_from_malformed() {
    assert_eq!(xml("<a><b></a>"), "<a><b /></a>\n");
}

#[test]
fn test_comment() {
    assert_eq!(xml("<a>\n<!-- c -->\n</a>"), "<a>\n  <!-- c -->\n</a>\n");
}

#[test]
fn test_document() {
    let source = r#"<?xml version="1.0" encoding="utf-8"?>
<object name="portal_types"  meta_type="Plone Types Tool">

<property name="title">Controls the available content types</property>
<object name="Document" meta_type="Dexterity FTI"/>
</object>"#;
    assert_snapshot!(xml(source), @r###"
<?xml version="1.0" encoding="utf-8"?>
<object meta_type="Plone Types Tool"
        name="portal_types"
>

  <property name="title">Controls the available content types</property>
  <object meta_type="Dexterity FTI"
          name="Document"
  />
</object>
"###);
}

#[test]
fn test_document_is_stable() {
    let once = Prettifier::xml("<a><b c=\"1\" d=\"2\">t</b><!--x--></a>").render();
    assert!(Prettifier::xml(once).check());
}
