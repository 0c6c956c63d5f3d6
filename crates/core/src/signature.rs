/// Type compatibility between predicate arguments and declared parameters.
use crate::ast::{Domain, PredicateDeclaration, PrimitiveTypeDeclaration, Type, TypeId};

/// `lhs` is `rhs` or one of its descendants. Everything is an `object`.
pub fn is_subtype(types: &[PrimitiveTypeDeclaration], lhs: TypeId, rhs: TypeId) -> bool {
    let mut visited = vec![false; types.len()];
    is_subtype_inner(types, lhs, rhs, &mut visited)
}

fn is_subtype_inner(
    types: &[PrimitiveTypeDeclaration],
    lhs: TypeId,
    rhs: TypeId,
    visited: &mut [bool],
) -> bool {
    if lhs == rhs || types[rhs.0].name == "object" {
        return true;
    }
    if std::mem::replace(&mut visited[lhs.0], true) {
        return false;
    }
    types[lhs.0]
        .parents
        .iter()
        .any(|&parent| is_subtype_inner(types, parent, rhs, visited))
}

/// An argument of type `lhs` may be passed where `rhs` is expected.
///
/// Either types match when at least one pair of members does.
pub fn type_matches(types: &[PrimitiveTypeDeclaration], lhs: &Type, rhs: &Type) -> bool {
    match (lhs, rhs) {
        (Type::Primitive(lhs), Type::Primitive(rhs)) => is_subtype(types, *lhs, *rhs),
        (Type::Primitive(lhs), Type::Either(rhs)) => {
            rhs.iter().any(|&member| is_subtype(types, *lhs, member))
        }
        (Type::Either(lhs), Type::Primitive(rhs)) => {
            lhs.iter().any(|&member| is_subtype(types, member, *rhs))
        }
        (Type::Either(lhs), Type::Either(rhs)) => lhs
            .iter()
            .any(|&member| rhs.iter().any(|&candidate| is_subtype(types, member, candidate))),
    }
}

/// Like [`type_matches`] for declarations that may be untyped.
///
/// An untyped parameter takes any argument; an untyped argument only fits
/// untyped parameters or parameters of type `object`.
pub fn optional_type_matches(
    types: &[PrimitiveTypeDeclaration],
    lhs: Option<&Type>,
    rhs: Option<&Type>,
) -> bool {
    match (lhs, rhs) {
        (None, None) | (Some(_), None) => true,
        (None, Some(rhs)) => is_object(types, rhs),
        (Some(lhs), Some(rhs)) => type_matches(types, lhs, rhs),
    }
}

fn is_object(types: &[PrimitiveTypeDeclaration], ty: &Type) -> bool {
    match ty {
        Type::Primitive(id) => types[id.0].name == "object",
        Type::Either(members) => members.iter().all(|id| types[id.0].name == "object"),
    }
}

/// Name, arity and per-argument type check of a predicate use.
pub fn matches(
    domain: &Domain,
    name: &str,
    argument_types: &[Option<&Type>],
    declaration: &PredicateDeclaration,
) -> bool {
    declaration.name == name
        && declaration.parameters.len() == argument_types.len()
        && declaration
            .parameters
            .iter()
            .zip(argument_types)
            .all(|(&parameter, &argument)| {
                optional_type_matches(
                    &domain.types,
                    argument,
                    domain.variable(parameter).ty.as_ref(),
                )
            })
}
