//! Golden tests for the markup generator.

#[cfg(test)]
mod tests {
    use crate::codegen::{
        serialize_props, serialize_template_props, ComponentImport, GeneratorOptions,
        ImportSource, MarkupGenerator,
    };
    use crate::codegen::RenderMode;
    use crate::error::ERR_MALFORMED_NODE;
    use crate::node::{ComponentDefinition, Node, NodeKind, Prop, PropType, Tree};
    use crate::registry::ComponentRegistry;
    use pretty_assertions::assert_eq;

    fn tree_of(children: Vec<Node>) -> Tree {
        let mut tree = Tree::new();
        tree.root.children = children;
        tree
    }

    fn lenient() -> MarkupGenerator {
        MarkupGenerator::default()
    }

    fn strict() -> MarkupGenerator {
        MarkupGenerator::new(GeneratorOptions::strict())
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SCREEN RENDERING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_card_with_header_prop() {
        let tree = tree_of(vec![
            Node::element("card").with_prop(Prop::new("cardHeader", "Welcome"))
        ]);
        let out = lenient().render_tree(&tree).unwrap();
        assert_eq!(
            out,
            "import { Card } from \"../../../componentregistry/card.jsx\";\n\
             \n\
             export default function GeneratedApp() {\n    return (\n        <div>\n\
             <Card cardHeader=\"Welcome\" />\n        </div>\n    );\n}"
        );
    }

    #[test]
    fn test_button_text_child_is_promoted() {
        let tree = tree_of(vec![
            Node::element("button").with_child(Node::literal("Click me!"))
        ]);
        let out = lenient().render_tree(&tree).unwrap();
        assert!(out.contains("<Button text=\"Click me!\" />"));
        assert!(!out.contains(">Click me!<"));
        assert!(!out.contains("</Button>"));
    }

    #[test]
    fn test_text_child_becomes_content() {
        let node = Node::element("text")
            .with_prop(Prop::new("className", "text-lg"))
            .with_child(Node::literal("Hello"));
        assert_eq!(
            lenient().render_node(&node, 1).unwrap(),
            "  <Text className=\"text-lg\" content=\"Hello\" />"
        );
    }

    #[test]
    fn test_promotion_keeps_explicit_duplicate() {
        let node = Node::element("button")
            .with_prop(Prop::new("text", "A"))
            .with_child(Node::literal("B"));
        assert_eq!(
            lenient().render_node(&node, 0).unwrap(),
            "<Button text=\"A\" text=\"B\" />"
        );
    }

    #[test]
    fn test_unmapped_component_drops_children() {
        let node = Node::element("card")
            .with_child(Node::literal("ignored"))
            .with_child(Node::element("div").with_child(Node::literal("also ignored")));
        assert_eq!(lenient().render_node(&node, 0).unwrap(), "<Card />");
    }

    #[test]
    fn test_container_renders_children() {
        let node = Node::element("container")
            .with_prop(Prop::new("className", "max-w-4xl"))
            .with_child(Node::element("button").with_child(Node::literal("Go")))
            .with_child(Node::element("p").with_child(Node::literal("Body")));
        assert_eq!(
            lenient().render_node(&node, 1).unwrap(),
            "  <Container className=\"max-w-4xl\">\n    <Button text=\"Go\" />\n    <p>\nBody\n    </p>\n  </Container>"
        );
    }

    #[test]
    fn test_container_blank_body_is_omitted() {
        let empty = Node::element("container");
        assert_eq!(lenient().render_node(&empty, 0).unwrap(), "<Container></Container>");

        let only_malformed = Node::element("container").with_child(Node {
            kind: NodeKind::Untyped,
            ..Node::group()
        });
        assert_eq!(
            lenient().render_node(&only_malformed, 0).unwrap(),
            "<Container></Container>"
        );
    }

    #[test]
    fn test_host_elements_nest_with_indentation() {
        let node = Node::element("section").with_child(
            Node::element("div").with_child(Node::element("span").with_child(Node::literal("hi"))),
        );
        assert_eq!(
            lenient().render_node(&node, 0).unwrap(),
            "<section>\n  <div>\n    <span>\nhi\n    </span>\n  </div>\n</section>"
        );
    }

    #[test]
    fn test_self_closing_host_never_has_body() {
        let node = Node::element("img")
            .with_prop(Prop::new("src", "a.png"))
            .with_child(Node::literal("alt text"));
        let out = lenient().render_node(&node, 2).unwrap();
        assert_eq!(out, "    <img src=\"a.png\" />");
        assert!(!out.contains("</img>"));

        let br = Node::element("br");
        assert_eq!(lenient().render_node(&br, 0).unwrap(), "<br />");
    }

    #[test]
    fn test_group_does_not_nest() {
        let node = Node::element("div").with_child(
            Node::group()
                .with_child(Node::element("span"))
                .with_child(Node::element("em")),
        );
        assert_eq!(
            lenient().render_node(&node, 0).unwrap(),
            "<div>\n  <span></span>\n  <em></em>\n</div>"
        );
        assert_eq!(lenient().render_node(&Node::group(), 3).unwrap(), "");
    }

    #[test]
    fn test_literal_reference_and_no_escaping() {
        let node = Node::element("div")
            .with_child(Node::literal("$title"))
            .with_child(Node::literal("a < b & \"c\""));
        assert_eq!(
            lenient().render_node(&node, 0).unwrap(),
            "<div>\n{title}\na < b & \"c\"\n</div>"
        );
    }

    #[test]
    fn test_generated_app_layout() {
        let section = Node::element("section")
            .with_prop(Prop::new("className", "flex w-full py-2 px-4 bg-gray-100 min-h-screen"))
            .with_child(
                Node::element("card")
                    .with_prop(Prop::new("cardHeader", "Updated Card Title"))
                    .with_prop(Prop::new("cardFooter", "This card has been updated!"))
                    .with_prop(Prop::new("cardImage", "https://via.placeholder.com/300x200")),
            )
            .with_child(
                Node::element("button")
                    .with_prop(Prop::new(
                        "className",
                        "bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded",
                    ))
                    .with_child(Node::literal("Click me!")),
            )
            .with_child(
                Node::element("text")
                    .with_prop(Prop::new("className", "text-lg text-gray-800 mt-4"))
                    .with_child(Node::literal("This is a dynamically generated text element!")),
            )
            .with_child(
                Node::element("container")
                    .with_prop(Prop::new(
                        "className",
                        "max-w-4xl mx-auto p-4 bg-white rounded-lg shadow-lg",
                    ))
                    .with_child(
                        Node::element("button")
                            .with_prop(Prop::new(
                                "className",
                                "bg-green-500 hover:bg-green-700 text-white font-bold py-2 px-4 rounded mr-2",
                            ))
                            .with_child(Node::literal("Container Button")),
                    )
                    .with_child(
                        Node::element("text")
                            .with_prop(Prop::new("className", "text-gray-600 ml-4"))
                            .with_child(Node::literal("This text is inside the container!")),
                    ),
            );

        let expected = r#"import { Card } from "../../../componentregistry/card.jsx";
import { Button } from "../../../componentregistry/button.jsx";
import { Text } from "../../../componentregistry/text.jsx";
import { Container } from "../../../componentregistry/container.jsx";

export default function GeneratedApp() {
    return (
        <div>
<section className="flex w-full py-2 px-4 bg-gray-100 min-h-screen">
  <Card cardHeader="Updated Card Title" cardFooter="This card has been updated!" cardImage="https://via.placeholder.com/300x200" />
  <Button className="bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded" text="Click me!" />
  <Text className="text-lg text-gray-800 mt-4" content="This is a dynamically generated text element!" />
  <Container className="max-w-4xl mx-auto p-4 bg-white rounded-lg shadow-lg">
    <Button className="bg-green-500 hover:bg-green-700 text-white font-bold py-2 px-4 rounded mr-2" text="Container Button" />
    <Text className="text-gray-600 ml-4" content="This text is inside the container!" />
  </Container>
</section>
        </div>
    );
}"#;

        let tree = tree_of(vec![section]);
        assert_eq!(lenient().render_tree(&tree).unwrap(), expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let tree = tree_of(vec![
            Node::element("card").with_prop(Prop::new("cardHeader", "A")),
            Node::element("profileCard").with_child(Node::element("div")),
        ]);
        let generator = lenient();
        assert_eq!(
            generator.render_tree(&tree).unwrap(),
            generator.render_tree(&tree).unwrap()
        );
    }

    #[test]
    fn test_empty_tree() {
        let out = lenient().render_tree(&Tree::new()).unwrap();
        assert_eq!(
            out,
            "\nexport default function GeneratedApp() {\n    return (\n        <div>\n\n        </div>\n    );\n}"
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // IMPORTS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_imports_are_distinct_and_classified() {
        let tree = tree_of(vec![
            Node::element("button"),
            Node::element("div").with_child(Node::element("profileCard")),
            Node::element("button"),
            Node::element("card"),
        ]);
        let generator = lenient();
        assert_eq!(
            generator.collect_imports(&tree),
            vec![
                ComponentImport {
                    node_type: "button".into(),
                    source: ImportSource::Registry
                },
                ComponentImport {
                    node_type: "profileCard".into(),
                    source: ImportSource::User
                },
                ComponentImport {
                    node_type: "card".into(),
                    source: ImportSource::Registry
                },
            ]
        );
        assert_eq!(
            generator.render_imports(&tree),
            "import { Button } from \"../../../componentregistry/button.jsx\";\n\
             import { ProfileCard } from \"../../../usercomponents/profileCard.jsx\";\n\
             import { Card } from \"../../../componentregistry/card.jsx\";\n"
        );
    }

    #[test]
    fn test_import_roots_are_configurable() {
        let generator = MarkupGenerator::new(GeneratorOptions {
            registry_import_root: "@registry".into(),
            app_component_name: "Screen".into(),
            ..GeneratorOptions::default()
        });
        let out = generator
            .render_tree(&tree_of(vec![Node::element("card")]))
            .unwrap();
        assert!(out.starts_with("import { Card } from \"@registry/card.jsx\";\n"));
        assert!(out.contains("export default function Screen() {"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ATTRIBUTES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_attribute_serialization_by_type() {
        let props = vec![
            Prop::typed("disabled", PropType::Boolean, true),
            Prop::typed("hidden", PropType::Boolean, false),
            Prop::typed("count", PropType::Number, 3i64),
            Prop::typed("title", PropType::String, "x"),
            Prop::typed("data", PropType::Other("object".into()), "raw"),
            Prop::new("plain", "p"),
            Prop {
                name: "missing".into(),
                value: None,
                initial_value: None,
                prop_type: Some(PropType::String),
            },
            Prop::schema("fallback", PropType::String, "init"),
        ];
        assert_eq!(
            serialize_props(&props),
            " disabled count={3} title=\"x\" data=\"raw\" plain=\"p\" fallback=\"init\""
        );
    }

    #[test]
    fn test_number_props_print_like_js() {
        let props: Vec<Prop> = serde_json::from_str(
            r#"[
                { "name": "count", "type": "number", "value": 1e3 },
                { "name": "ratio", "type": "number", "value": 1.50 }
            ]"#,
        )
        .unwrap();
        assert_eq!(serialize_props(&props), " count={1000} ratio={1.5}");
    }

    #[test]
    fn test_template_props_resolve_references() {
        let props = vec![
            Prop::schema("src", PropType::String, "$cardImage"),
            Prop::schema("alt", PropType::String, "Card Image"),
        ];
        assert_eq!(
            serialize_template_props(&props),
            " src={cardImage} alt=\"Card Image\""
        );
        assert_eq!(
            serialize_props(&props),
            " src=\"$cardImage\" alt=\"Card Image\""
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // DEFINITION RENDERING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_builtin_card_definition_module() {
        let registry = ComponentRegistry::new();
        let card = registry.get("card").unwrap();
        let expected = r#"export function Card({ className, cardFooter, cardHeader, cardImage }) {
    return (
  <div className="font-bold text-lg mb-2">
{cardHeader}
  </div>
  <img src={cardImage} alt="Card Image" className="w-full h-48 object-cover rounded mb-4" />
  <div className="text-gray-600">
{cardFooter}
  </div>
    );
}"#;
        assert_eq!(lenient().render_definition(card).unwrap(), expected);
    }

    #[test]
    fn test_definition_root_wrapper_is_unwrapped() {
        let mut def = ComponentDefinition::new("badge");
        def.props.push(Prop::schema("label", PropType::String, "New"));
        def.children.push(
            Node::element("badge")
                .with_child(Node::element("span").with_child(Node::literal("$label"))),
        );
        assert_eq!(
            lenient().render_definition(&def).unwrap(),
            "export function Badge({ label }) {\n    return (\n  <span>\n{label}\n  </span>\n    );\n}"
        );
    }

    #[test]
    fn test_definition_without_props_or_children() {
        let def = ComponentDefinition::new("spacer");
        assert_eq!(
            lenient().render_definition(&def).unwrap(),
            "export function Spacer() {\n    return (\n\n    );\n}"
        );
    }

    #[test]
    fn test_definition_does_not_promote_or_capitalize() {
        let mut def = ComponentDefinition::new("panel");
        def.children.push(
            Node::element("div").with_child(Node::element("button").with_child(Node::literal("Go"))),
        );
        let out = lenient().render_definition(&def).unwrap();
        assert!(out.contains("    <button>\nGo\n    </button>"));
        assert!(!out.contains("import"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // STRICT / LENIENT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_untyped_node_lenient_vs_strict() {
        let untyped = Node {
            kind: NodeKind::Untyped,
            ..Node::group()
        };
        assert_eq!(lenient().render_node(&untyped, 0).unwrap(), "");
        let err = strict().render_node(&untyped, 0).unwrap_err();
        assert_eq!(err.code(), ERR_MALFORMED_NODE);

        let tree = tree_of(vec![untyped]);
        assert!(lenient().render_tree(&tree).is_ok());
        assert!(strict().render_tree(&tree).is_err());
    }

    #[test]
    fn test_literal_without_value_lenient_vs_strict() {
        let empty = Node {
            kind: NodeKind::Literal(None),
            ..Node::group()
        };
        let node = Node::element("div").with_child(empty);
        assert_eq!(lenient().render_node(&node, 0).unwrap(), "<div></div>");
        assert_eq!(
            strict().render_node(&node, 0).unwrap_err().code(),
            ERR_MALFORMED_NODE
        );
    }

    #[test]
    fn test_invalid_tag_only_rejected_in_strict_mode() {
        let node = Node::element("not a tag");
        assert!(lenient().render_node(&node, 0).is_ok());
        assert_eq!(
            strict().render_node(&node, 0).unwrap_err().code(),
            ERR_MALFORMED_NODE
        );

        let mut def = ComponentDefinition::new("broken");
        def.children.push(Node {
            kind: NodeKind::Untyped,
            ..Node::group()
        });
        assert!(lenient().render_definition(&def).is_ok());
        assert!(strict().render_definition(&def).is_err());
    }

    #[test]
    fn test_generator_reports_its_mode() {
        assert_eq!(lenient().options().mode, RenderMode::Lenient);
        assert_eq!(strict().options().mode, RenderMode::Strict);
        assert_eq!(strict().options().app_component_name, "GeneratedApp");
    }
}
