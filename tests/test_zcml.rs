use insta::assert_snapshot;

use zpretty::{prettify, Dialect, Prettifier};

fn zcml(source: &str) -> String {
    prettify(source, &Dialect::zcml())
}

const SAMPLE: &str = r#"<configure
    xmlns="http://namespaces.zope.org/zope"
    xmlns:browser="http://namespaces.zope.org/browser"
    xmlns:genericsetup="http://namespaces.zope.org/genericsetup"
    >

  <include package=".browser" />

  <browser:page
      name="view"
      for="*"
      permission="zope2.View"
      class=".views.View"
      />

  <subscriber
      for="zope.interface.Interface
           zope.lifecycleevent.IObjectModifiedEvent"
      handler=".events.modified"
      />

  <genericsetup:registerProfile
      name="default"
      title="Example"
      description="Installs the example package"
      directory="profiles/default"
      provides="Products.GenericSetup.interfaces.EXTENSION"
      />

</configure>
"#;

#[test]
fn test_sample_is_stable() {
    assert_eq!(zcml(SAMPLE), SAMPLE);
    assert!(Prettifier::zcml(SAMPLE).check());
}

#[test]
fn test_wrapped_for() {
    assert_eq!(
        zcml("<zcml for=\"foo  bar\" handler=\"bar\"/>"),
        "<zcml\n    for=\"foo\n         bar\"\n    handler=\"bar\"\n    />\n"
    );
}

#[test]
fn test_single_attribute_stays_inline() {
    assert_eq!(
        zcml("<include\n    package=\".browser\"/>"),
        "<include package=\".browser\" />\n"
    );
}

#[test]
fn test_directive_order() {
    let source = r#"<configure xmlns:browser="http://namespaces.zope.org/browser">
<browser:page permission="zope2.View" class=".views.View" name="view" for="*" />
</configure>"#;
    assert_snapshot!(zcml(source), @r###"
<configure xmlns:browser="http://namespaces.zope.org/browser">
  <browser:page
      name="view"
      for="*"
      permission="zope2.View"
      class=".views.View"
      />
</configure>
"###);
}

#[test]
fn test_unknown_directive_uses_fallback_order() {
    assert_eq!(
        zcml("<configure><thing zzz=\"1\" template=\"t.pt\" name=\"a\"/></configure>"),
        "<configure><thing\n      name=\"a\"\n      template=\"t.pt\"\n      zzz=\"1\"\n      /></configure>\n"
    );
}
