use graphql_hir::TypeSystem;
use graphql_test_utils::{format_diagnostics, BASIC_SCHEMA, SCHEMA_WITH_DEPRECATIONS};
use graphql_validation::{
    run_sdl_rules, sdl_rules, DiagnosticSeverity, ValidationConfig, Validator,
};
use std::path::Path;
use std::sync::Arc;

fn schema(sdl: &str) -> Arc<TypeSystem> {
    Arc::new(TypeSystem::parse(sdl, "schema.graphql").unwrap())
}

fn validate_sdl(sdl: &str, base: Option<&str>) -> String {
    let tree = apollo_parser::Parser::new(sdl).parse();
    let diagnostics = Validator::default().validate_sdl(&tree, base.map(schema));
    format_diagnostics(&diagnostics)
}

fn validate_document(source: &str) -> String {
    let tree = apollo_parser::Parser::new(source).parse();
    let diagnostics =
        Validator::default().validate_document(&tree, schema(SCHEMA_WITH_DEPRECATIONS));
    format_diagnostics(&diagnostics)
}

#[test]
fn test_sdl_rules_report_in_traversal_order() {
    let sdl = r"
directive @auth on FIELD_DEFINITION
type User { id: ID! }
directive @auth on OBJECT
type User { name: String }
scalar User
";
    insta::assert_snapshot!(validate_sdl(sdl, None), @r#"
    [1] error[unique_directive_names]: There can be only one directive named "@auth".
    [2] error[unique_type_names]: There can be only one type named "User".
    [3] error[unique_type_names]: There can be only one type named "User".
    "#);
}

#[test]
fn test_types_and_directives_are_separate_namespaces() {
    insta::assert_snapshot!(
        validate_sdl("type cached { id: ID } directive @cached on FIELD", None),
        @"(no diagnostics)"
    );
}

#[test]
fn test_extending_an_existing_schema() {
    let sdl = r"
type User { email: String }
directive @cached on FIELD
type Post { id: ID! }
directive @published on FIELD
type User { age: Int }
";
    insta::assert_snapshot!(validate_sdl(sdl, Some(BASIC_SCHEMA)), @r#"
    [1] error[unique_type_names]: Type "User" already exists in the schema. It cannot also be defined in this type definition.
    [2] error[unique_directive_names]: Directive "@cached" already exists in the schema. It cannot be redefined.
    [3] error[unique_type_names]: Type "User" already exists in the schema. It cannot also be defined in this type definition.
    "#);
}

#[test]
fn test_sdl_diagnostics_point_at_names() {
    let sdl = "type Foo { id: ID }\ntype Foo { id: ID }";
    let tree = apollo_parser::Parser::new(sdl).parse();
    let diagnostics = Validator::default().validate_sdl(&tree, None);
    assert_eq!(diagnostics.len(), 1);

    let texts: Vec<_> = diagnostics[0]
        .nodes
        .iter()
        .map(|node| &sdl[node.range.start..node.range.end])
        .collect();
    assert_eq!(texts, vec!["Foo", "Foo"]);
    assert_eq!(diagnostics[0].primary_range().unwrap().start, 25);
}

#[test]
fn test_document_deprecations() {
    let source = r#"
query Feed($status: PostStatus = ARCHIVED) {
  oldUser(id: "1") {
    username
    name
  }
  posts(filter: { tag: "graphql" }, limit: 10) @old(limit: 1) {
    title
    author { legacyId }
  }
}
"#;
    insta::assert_snapshot!(validate_document(source), @r#"
    [1] warning[no_deprecated]: The enum value "PostStatus.ARCHIVED" is deprecated. Use DRAFT instead
    [2] warning[no_deprecated]: The field Query.oldUser is deprecated. Use user instead
    [3] warning[no_deprecated]: The field User.username is deprecated. Use name instead
    [4] warning[no_deprecated]: The input field PostFilter.tag is deprecated. Use tags
    [5] warning[no_deprecated]: Field "Query.posts" argument "limit" is deprecated. Use first
    [6] warning[no_deprecated]: Directive "@old" argument "limit" is deprecated. No limit anymore
    [7] warning[no_deprecated]: The field User.legacyId is deprecated. No longer supported
    "#);
}

#[test]
fn test_clean_document_passes() {
    insta::assert_snapshot!(
        validate_document("query { user(id: \"1\") { id name posts(status: DRAFT) { title } } }"),
        @"(no diagnostics)"
    );
}

#[test]
fn test_mutation_input_pass_through() {
    insta::assert_snapshot!(
        validate_document("mutation { createPost(input: { title: \"t\", status: PUBLISHED }) { id } }"),
        @"(no diagnostics)"
    );
}

#[test]
fn test_runs_are_independent() {
    let validator = Validator::default();
    let tree = apollo_parser::Parser::new("type A { id: ID } type A { id: ID }").parse();

    let first = validator.validate_sdl(&tree, None);
    let second = validator.validate_sdl(&tree, None);
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[test]
fn test_runner_with_registry_rules() {
    let tree = apollo_parser::Parser::new("enum E { A } enum E { B } directive @x on FIELD").parse();
    let diagnostics = run_sdl_rules(&tree, None, sdl_rules());
    insta::assert_snapshot!(format_diagnostics(&diagnostics), @r#"[1] error[unique_type_names]: There can be only one type named "E"."#);
}

#[test]
fn test_config_controls_rules_and_severity() {
    let config = ValidationConfig::parse(
        r#"{ "extends": "recommended", "rules": { "unique_directive_names": "off", "no_deprecated": "error" } }"#,
        Path::new("validation.json"),
    )
    .unwrap();
    let validator = Validator::new(config);

    let sdl = apollo_parser::Parser::new("directive @d on FIELD directive @d on FIELD").parse();
    assert!(validator.validate_sdl(&sdl, None).is_empty());

    let document = apollo_parser::Parser::new("{ user(id: 1) { legacyId } }").parse();
    let diagnostics = validator.validate_document(&document, schema(SCHEMA_WITH_DEPRECATIONS));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
}
