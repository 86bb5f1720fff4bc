//! Case-conversion filters available to every indexed template.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use tera::{Result, Tera, Value};

/// Register all custom filters on a Tera instance.
pub(crate) fn register(tera: &mut Tera) {
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("pascal_case", pascal_case);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("kebab_case", kebab_case);
}

fn convert(value: &Value, filter: &str, f: impl Fn(&str) -> String) -> Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))?;
    Ok(Value::String(f(s)))
}

pub fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert(value, "snake_case", |s| s.to_snake_case())
}

pub fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert(value, "pascal_case", |s| s.to_pascal_case())
}

pub fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert(value, "camel_case", |s| s.to_lower_camel_case())
}

pub fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert(value, "kebab_case", |s| s.to_kebab_case())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    fn render(template: &str, title: Value) -> Result<String> {
        let mut tera = Tera::default();
        register(&mut tera);
        tera.add_raw_template("page.tera", template)?;
        let mut context = Context::new();
        context.insert("Title", &title);
        tera.render("page.tera", &context)
    }

    #[test]
    fn test_filters_in_templates() {
        let title = Value::String("Getting Started Guide".to_string());
        assert_eq!(
            render("{{ Title | kebab_case }}", title.clone()).unwrap(),
            "getting-started-guide"
        );
        assert_eq!(
            render("{{ Title | snake_case }}", title.clone()).unwrap(),
            "getting_started_guide"
        );
        assert_eq!(
            render("{{ Title | pascal_case }}", title.clone()).unwrap(),
            "GettingStartedGuide"
        );
        assert_eq!(
            render("{{ Title | camel_case }}", title).unwrap(),
            "gettingStartedGuide"
        );
    }

    #[test]
    fn test_filter_rejects_non_string() {
        let args = HashMap::new();
        let err = kebab_case(&Value::Number(7.into()), &args).unwrap_err();
        assert!(err.to_string().contains("kebab_case"));

        assert!(render("{{ Title | snake_case }}", Value::Bool(true)).is_err());
    }
}
