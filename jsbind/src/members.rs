///
/// Member Synthesis
///
/// Adds a `toJSON` instance method to JSON-tagged types that declare a
/// zero-argument static `jsonAdapter()`. The method hands the adapter and
/// the instance to the support library's `marshalToJsonObject`.
///

use tracing::debug;

use crate::ir::{IrType, MetadataKey, MethodKind, MethodShape, TypeShape, Visibility};
use crate::js::{Expr, Formal, Member, Method, Statement};
use crate::support::{ExternalReference, ExternalReferenceRegistry};

const JSON_ADAPTER: &str = "jsonAdapter";
/// Method name `JSON.stringify` looks for.
const TO_JSON: &str = "toJSON";

fn marshal_to_json_object() -> ExternalReference {
    ExternalReference::core("marshalToJsonObject")
}

fn is_json_adapter(member: &Member) -> Option<&Method> {
    match member {
        Member::Method(m)
            if m.is_static
                && m.dot_name == JSON_ADAPTER
                && !m.may_yield
                && m.type_parameters.is_empty()
                && m.formals.is_empty()
                && m.rest.is_none() =>
        {
            Some(m)
        }
        _ => None,
    }
}

/// Returns `members`, plus a synthesized `toJSON` when the type qualifies.
/// Running it on its own output adds nothing.
pub fn adjust_members(
    shape: &TypeShape,
    mut members: Vec<Member>,
    registry: &ExternalReferenceRegistry,
) -> Vec<Member> {
    let Some(adapter) = members.iter().find_map(is_json_adapter) else {
        return members;
    };
    let has_to_json = members.iter().any(|m| m.is_instance() && m.dot_name() == Some(TO_JSON));
    if has_to_json || !shape.has_metadata(&MetadataKey::json()) {
        return members;
    }

    let p = adapter.span.right_edge();
    let names = registry.names();
    let method_name = names.fresh(TO_JSON);
    let this_name = names.fresh("this");
    let ty = IrType::of_shape(shape);

    // return marshalToJsonObject(Type.jsonAdapter(), this);
    let marshal = registry.require(&marshal_to_json_object());
    let adapter_call = Expr::call(p, Expr::dot(p, Expr::ident(p, shape.name.as_str()), JSON_ADAPTER), vec![]);
    let body = vec![Statement::Return {
        span: p,
        value: Some(Expr::call(p, Expr::name(p, marshal), vec![adapter_call, Expr::This { span: p }])),
    }];

    debug!(type_name = %shape.name, method = %method_name, "synthesized toJSON");

    let method = Method {
        span: p,
        dot_name: TO_JSON.to_string(),
        name: method_name.clone(),
        is_static: false,
        type_parameters: Vec::new(),
        this_name: Some(this_name.clone()),
        formals: vec![Formal { span: p, name: this_name, ty }],
        rest: None,
        return_type: IrType::any_value(),
        body,
        visibility: Visibility::Public,
        may_yield: false,
        shape: Some(MethodShape {
            enclosing_type: shape.name.clone(),
            name: method_name.to_string(),
            symbol: TO_JSON.to_string(),
            visibility: Visibility::Public,
            kind: MethodKind::Normal,
            may_yield: false,
        }),
    };
    members.push(Member::Method(method));
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::{JsIdentifierName, render_member, render_statements};
    use crate::source::Span;

    fn method(dot_name: &str, is_static: bool, span: Span) -> Member {
        Member::Method(Method {
            span,
            dot_name: dot_name.to_string(),
            name: JsIdentifierName::new(dot_name),
            is_static,
            type_parameters: Vec::new(),
            this_name: None,
            formals: Vec::new(),
            rest: None,
            return_type: IrType::any_value(),
            body: Vec::new(),
            visibility: Visibility::Public,
            may_yield: false,
            shape: None,
        })
    }

    fn point() -> TypeShape {
        TypeShape::new("Point").with_metadata(MetadataKey::json())
    }

    fn adapter() -> Member {
        method(JSON_ADAPTER, true, Span::new(40, 80, 0))
    }

    #[test]
    fn test_synthesizes_to_json() {
        let registry = ExternalReferenceRegistry::new();
        let members = adjust_members(&point(), vec![adapter()], &registry);
        assert_eq!(members.len(), 2);

        let Member::Method(to_json) = &members[1] else {
            panic!("expected a method");
        };
        assert_eq!(to_json.dot_name, "toJSON");
        assert!(!to_json.is_static);
        assert_eq!(to_json.span, Span::new(80, 80, 0));
        assert_eq!(to_json.formals[0].ty, IrType::named("Point"));
        assert_eq!(to_json.return_type, IrType::any_value());
        assert_eq!(to_json.shape.as_ref().map(|s| s.symbol.as_str()), Some("toJSON"));

        insta::assert_snapshot!(render_member(&members[1]), @r"
        toJSON() {
          return marshalToJsonObject__2(Point.jsonAdapter(), this);
        }
        ");
        assert_eq!(
            render_statements(&registry.imports(&Default::default())),
            r#"import { marshalToJsonObject as marshalToJsonObject__2 } from "jsbind-core";"#
        );
    }

    #[test]
    fn test_is_idempotent() {
        let registry = ExternalReferenceRegistry::new();
        let once = adjust_members(&point(), vec![adapter()], &registry);
        let twice = adjust_members(&point(), once.clone(), &registry);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_to_json_is_kept() {
        let registry = ExternalReferenceRegistry::new();
        let members = vec![adapter(), method("toJSON", false, Span::new(90, 99, 0))];
        assert_eq!(adjust_members(&point(), members.clone(), &registry), members);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_requires_json_metadata_and_zero_argument_adapter() {
        let registry = ExternalReferenceRegistry::new();
        let plain = TypeShape::new("Point");
        assert_eq!(adjust_members(&plain, vec![adapter()], &registry).len(), 1);

        let instance_adapter = method(JSON_ADAPTER, false, Span::new(0, 5, 0));
        assert_eq!(adjust_members(&point(), vec![instance_adapter], &registry).len(), 1);

        let Member::Method(mut generic) = adapter() else { unreachable!() };
        generic.type_parameters.push("T".to_string());
        assert_eq!(adjust_members(&point(), vec![Member::Method(generic)], &registry).len(), 1);
    }
}
