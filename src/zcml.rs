//! Attribute order of the ZCML style guide.
use ahash::HashMap;

use crate::dialect::AttributeOrder;

const ZOPE: &str = "http://namespaces.zope.org/zope";
const BROWSER: &str = "http://namespaces.zope.org/browser";
const GENERICSETUP: &str = "http://namespaces.zope.org/genericsetup";
const FIVE: &str = "http://namespaces.zope.org/five";
const PLONE: &str = "http://namespaces.plone.org/plone";
const I18N: &str = "http://namespaces.zope.org/i18n";

/// Used for any directive that has no entry of its own.
///
/// Directive rows list attributes this order does not know about, but
/// never contradict it.
pub const FALLBACK_ORDER: [&str; 15] = [
    "name",
    "title",
    "description",
    "package",
    "file",
    "provides",
    "for",
    "factory",
    "manager",
    "permission",
    "class",
    "allowed_attributes",
    "attribute",
    "template",
    "layer",
];

#[rustfmt::skip]
const DIRECTIVES: &[(&str, &str, &[&str])] = &[
    // zope
    (ZOPE, "adapter", &["name", "provides", "for", "factory", "permission", "trusted", "locate"]),
    (ZOPE, "subscriber", &["provides", "for", "factory", "handler", "permission", "trusted", "locate"]),
    (ZOPE, "utility", &["name", "provides", "component", "factory", "permission"]),
    (ZOPE, "include", &["package", "file", "files"]),
    (ZOPE, "includeOverrides", &["package", "file", "files"]),
    (ZOPE, "exclude", &["package", "file", "files"]),
    (ZOPE, "permission", &["id", "title", "description"]),
    (ZOPE, "role", &["id", "title", "description"]),
    (ZOPE, "grant", &["permission", "role", "principal"]),
    (ZOPE, "class", &["class"]),
    (ZOPE, "require", &["permission", "attributes", "interface", "set_attributes", "set_schema", "like_class"]),
    (ZOPE, "allow", &["attributes", "interface"]),
    (ZOPE, "implements", &["interface"]),
    (ZOPE, "interface", &["interface", "type", "name"]),
    (ZOPE, "view", &["name", "provides", "type", "for", "factory", "permission", "layer"]),
    (ZOPE, "principal", &["id", "title", "description", "login", "password"]),
    // browser
    (BROWSER, "page", &["name", "title", "for", "permission", "class", "allowed_attributes", "allowed_interface", "attribute", "template", "layer", "menu"]),
    (BROWSER, "pages", &["for", "permission", "class", "allowed_attributes", "allowed_interface", "layer"]),
    (BROWSER, "view", &["name", "title", "provides", "for", "permission", "class", "allowed_attributes", "allowed_interface", "template", "layer", "menu"]),
    (BROWSER, "viewlet", &["name", "for", "view", "manager", "permission", "class", "template", "layer"]),
    (BROWSER, "viewletManager", &["name", "provides", "for", "view", "permission", "class", "template", "layer"]),
    (BROWSER, "resource", &["name", "file", "image", "factory", "permission", "template", "layer"]),
    (BROWSER, "resourceDirectory", &["name", "directory", "permission", "layer"]),
    (BROWSER, "menu", &["id", "title", "description", "interface", "class"]),
    (BROWSER, "menuItem", &["menu", "title", "description", "for", "action", "icon", "permission", "filter", "order"]),
    (BROWSER, "defaultView", &["name", "for", "layer"]),
    (BROWSER, "icon", &["name", "title", "file", "for", "resource", "layer"]),
    // genericsetup
    (GENERICSETUP, "registerProfile", &["name", "title", "description", "directory", "provides", "for"]),
    (GENERICSETUP, "upgradeStep", &["title", "description", "source", "destination", "sortkey", "handler", "profile"]),
    (GENERICSETUP, "upgradeSteps", &["source", "destination", "sortkey", "profile"]),
    (GENERICSETUP, "upgradeDepends", &["title", "description", "source", "destination", "import_profile", "import_steps", "run_deps", "purge", "sortkey", "profile"]),
    (GENERICSETUP, "importStep", &["name", "title", "description", "handler"]),
    (GENERICSETUP, "exportStep", &["name", "title", "description", "handler"]),
    // five
    (FIVE, "registerPackage", &["package", "initialize"]),
    (FIVE, "deprecatedManageAddDelete", &["class"]),
    // plone
    (PLONE, "behavior", &["name", "title", "description", "provides", "for", "factory", "marker"]),
    (PLONE, "static", &["name", "directory", "type"]),
    (PLONE, "portlet", &["name", "interface", "assignment", "renderer", "addview", "editview"]),
    (PLONE, "tile", &["name", "title", "description", "for", "add_permission", "schema", "permission", "class", "template", "layer"]),
    // i18n
    (I18N, "registerTranslations", &["directory"]),
];

/// The ZCML attribute order table.
pub fn attribute_order() -> AttributeOrder {
    let by_tag: HashMap<(String, String), Vec<String>> = DIRECTIVES
        .iter()
        .map(|(namespace, tag, order)| {
            (
                (namespace.to_string(), tag.to_string()),
                order.iter().map(|name| name.to_string()).collect(),
            )
        })
        .collect();
    AttributeOrder::Table {
        by_tag,
        fallback: FALLBACK_ORDER.iter().map(|name| name.to_string()).collect(),
    }
}
