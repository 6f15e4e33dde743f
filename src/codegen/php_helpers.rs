//! Low-level PHP source writing utilities shared by the entity and
//! repository emitters.

use super::naming::ucfirst;

/// Indentation of class members.
pub(crate) const INDENT: &str = "    ";

/// File preamble up to and including the namespace declaration.
pub(crate) fn file_header(namespace: &str) -> String {
    format!("<?php\n\ndeclare(strict_types=1);\n\nnamespace {};\n\n", namespace)
}

/// Escape a value for a single-quoted PHP string literal.
///
/// Only backslash and single quote are special inside single quotes.
pub(crate) fn escape_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Single-quoted PHP string literal.
///
/// Generates: `'value'`
pub(crate) fn quote(value: &str) -> String {
    format!("'{}'", escape_single_quoted(value))
}

/// PHP list of string literals.
///
/// Generates: `['a', 'b']`
pub(crate) fn string_list<S: AsRef<str>>(values: &[S]) -> String {
    let items: Vec<String> = values.iter().map(|v| quote(v.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

/// Member attribute line, e.g. `    #[ORM\Id]`.
pub(crate) fn member_attribute(body: &str) -> String {
    format!("{}#[{}]\n", INDENT, body)
}

/// Private property declaration. Nullable properties start out `null`.
pub(crate) fn property_declaration(name: &str, type_name: &str, nullable: bool) -> String {
    if nullable {
        format!("{}private ?{} ${} = null;\n\n", INDENT, type_name, name)
    } else {
        format!("{}private {} ${};\n\n", INDENT, type_name, name)
    }
}

/// Getter, plus a fluent setter unless the property is the identifier.
pub(crate) fn accessors(property: &str, type_name: &str, nullable: bool) -> String {
    let method_suffix = ucfirst(property);
    let declared = if nullable {
        format!("?{}", type_name)
    } else {
        type_name.to_string()
    };

    let mut code = String::new();
    code.push_str(&format!(
        "{i}public function get{m}(): {t}\n{i}{{\n{i}{i}return $this->{p};\n{i}}}\n\n",
        i = INDENT,
        m = method_suffix,
        t = declared,
        p = property,
    ));

    if is_identifier_property(property) {
        return code;
    }

    code.push_str(&format!(
        "{i}public function set{m}({t} ${p}): self\n{i}{{\n{i}{i}$this->{p} = ${p};\n\n{i}{i}return $this;\n{i}}}\n\n",
        i = INDENT,
        m = method_suffix,
        t = declared,
        p = property,
    ));
    code
}

/// Properties named `id` (any case) are identifiers: they get `#[ORM\Id]`
/// and no setter.
pub(crate) fn is_identifier_property(property: &str) -> bool {
    property.eq_ignore_ascii_case("id")
}
