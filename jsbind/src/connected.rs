///
/// Connected-Key Resolver
///
/// Binds standard-library members, named by connected keys such as
/// `String::slice`, to support code. Lookup order:
/// 1. keys with a custom idiom expand inline
/// 2. auto-supported keys become an external reference with a derived name
/// 3. a few keys are remapped to an explicit external name
///
/// Anything else has no binding and the caller decides what to do.
///

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::error::BackendError;
use crate::expand::Idiom;
use crate::ir::{Genre, IrType};
use crate::js::{BinaryOp, JsIdentifierName};
use crate::source::Span;
use crate::support::{ExternalReference, InlineExpansion, LibraryId, SupportCode, TypeReference};

static AUTO_SUPPORTED: LazyLock<IndexSet<&'static str>> = LazyLock::new(|| {
    [
        "Float64::near",
        "Float64::toInt32",
        "Float64::toInt32Unsafe",
        "Float64::toInt64",
        "Float64::toInt64Unsafe",
        "Float64::toString",
        "Int64::max",
        "Int64::min",
        "Int64::toFloat64",
        "Int64::toFloat64Unsafe",
        "Int64::toInt32",
        "Int64::toInt32Unsafe",
        "Listed::filter",
        "Listed::get",
        "Listed::getOr",
        "Listed::join",
        "Listed::map",
        "Listed::mapDropping",
        "Listed::reduceFrom",
        "Listed::slice",
        "Listed::sorted",
        "Listed::toList",
        "ListBuilder::add",
        "ListBuilder::addAll",
        "ListBuilder::toList",
        "ListBuilder::clear",
        "ListBuilder::removeLast",
        "ListBuilder::splice",
        "ListBuilder::reverse",
        "ListBuilder::set",
        "Map::constructor",
        "MapBuilder::constructor",
        "MapBuilder::remove",
        "MapBuilder::set",
        "Pair::constructor",
        "Mapped::length",
        "Mapped::get",
        "Mapped::getOr",
        "Mapped::has",
        "Mapped::keys",
        "Mapped::values",
        "Mapped::toMap",
        "Mapped::toMapBuilder",
        "Mapped::toList",
        "Mapped::toListWith",
        "Mapped::toListBuilder",
        "Mapped::toListBuilderWith",
        "Mapped::forEach",
        "DenseBitVector::constructor",
        "DenseBitVector::get",
        "DenseBitVector::set",
        "Deque::constructor",
        "Deque::add",
        "Deque::isEmpty",
        "Deque::removeFirst",
        "PromiseBuilder",
        "Regex::compileFormatted",
        "Regex::compiledFind",
        "Regex::compiledFound",
        "Regex::compiledReplace",
        "Regex::compiledSplit",
        "RegexFormatter::adjustCodeSet",
        "RegexFormatter::pushCodeTo",
        "String::countBetween",
        "String::fromCodePoint",
        "String::fromCodePoints",
        "String::forEach",
        "String::get",
        "String::hasAtLeast",
        "String::next",
        "String::prev",
        "String::step",
        "String::split",
        "String::toFloat64",
        "String::toInt32",
        "String::toInt64",
        "StringBuilder::appendCodePoint",
        // std/net
        "stdNetSend",
        "NetResponse",
        "NetResponse::getStatus",
        "NetResponse::getContentType",
        "NetResponse::getBodyContent",
    ]
    .into_iter()
    .collect()
});

static REMAPPED: LazyLock<IndexMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("Date::today", "dateToday"),
        ("Date::yearsBetween", "dateYearsBetween"),
        ("List::get", "listedGet"),
        ("empty", "empty"),
    ]
    .into_iter()
    .collect()
});

fn custom_idiom(key: &str, genre: Genre) -> Option<Idiom> {
    let math = |name: &'static str| Idiom::MathCall { name, arity: 1 };
    let math2 = |name: &'static str| Idiom::MathCall { name, arity: 2 };
    let idiom = match key {
        "Boolean::toString" | "Int32::toString" | "Int64::toString" => Idiom::ToString,
        // Every Int32 is already a Float64.
        "Int32::toFloat64" | "List::toList" | "String::toString" => Idiom::Identity,
        "Int32::toInt64" => Idiom::BigInt,
        "List::isEmpty" | "Listed::isEmpty" => Idiom::ListIsEmpty,
        "List::forEach" => Idiom::ListForEach,
        "List::toListBuilder" | "ListBuilder::toListBuilder" => Idiom::ListToListBuilder,
        "ListBuilder::constructor" => Idiom::ListBuilderNew,
        "String::isEmpty" => Idiom::StringIsEmpty,
        "Utf16StringSlice::length" | "String::end" => Idiom::Length,

        "Date::constructor" => Idiom::NewDate { genre },
        "Date::getYear" => Idiom::DateMethod("getUTCFullYear"),
        "Date::getMonth" => Idiom::DateGetMonth,
        // getUTCDay is the weekday
        "Date::getDay" => Idiom::DateMethod("getUTCDate"),
        "Date::getDayOfWeek" => Idiom::DateGetDayOfWeek,
        "Date::toString" => Idiom::DateToString,
        "Date::fromIsoString" => Idiom::DateFromIsoString { genre },

        "Test::bail" => Idiom::Bail,
        "ignore" => Idiom::Ignore,
        "::getConsole" => Idiom::GetConsole,

        "Float64::e" => Idiom::MathProperty("E"),
        "Float64::pi" => Idiom::MathProperty("PI"),
        "Float64::abs" => math("abs"),
        "Float64::acos" => math("acos"),
        "Float64::asin" => math("asin"),
        "Float64::atan" => math("atan"),
        "Float64::atan2" => math2("atan2"),
        "Float64::ceil" => math("ceil"),
        "Float64::cos" => math("cos"),
        "Float64::cosh" => math("cosh"),
        "Float64::exp" => math("exp"),
        "Float64::expm1" => math("expm1"),
        "Float64::floor" => math("floor"),
        "Float64::log" => math("log"),
        "Float64::log10" => math("log10"),
        "Float64::log1p" => math("log1p"),
        "Float64::max" | "Int32::max" => math2("max"),
        "Float64::min" | "Int32::min" => math2("min"),
        "Float64::round" => math("round"),
        "Float64::sign" => math("sign"),
        "Float64::sin" => math("sin"),
        "Float64::sinh" => math("sinh"),
        "Float64::sqrt" => math("sqrt"),
        "Float64::tan" => math("tan"),
        "Float64::tanh" => math("tanh"),

        "Mapped::length" => Idiom::MappedSize,
        "Mapped::has" => Idiom::MappedHas,
        "Mapped::keys" => Idiom::MappedArray("keys"),
        "Mapped::values" => Idiom::MappedArray("values"),

        "String::begin" => Idiom::StringBegin,
        "String::hasIndex" => Idiom::StringHasIndex,
        "String::slice" => Idiom::StringSlice,
        "StringIndexOption::compareTo" => Idiom::StringIndexCompare(BinaryOp::Sub),
        "StringIndexOption::compareTo::eq" => Idiom::StringIndexCompare(BinaryOp::StrictEq),
        "StringIndexOption::compareTo::ge" => Idiom::StringIndexCompare(BinaryOp::Ge),
        "StringIndexOption::compareTo::gt" => Idiom::StringIndexCompare(BinaryOp::Gt),
        "StringIndexOption::compareTo::le" => Idiom::StringIndexCompare(BinaryOp::Le),
        "StringIndexOption::compareTo::lt" => Idiom::StringIndexCompare(BinaryOp::Lt),
        "StringIndexOption::compareTo::ne" => Idiom::StringIndexCompare(BinaryOp::StrictNe),
        "StringIndex::none" => Idiom::StringIndexNone,
        "StringBuilder::constructor" => Idiom::StringBuilderNew,
        "StringBuilder::append" => Idiom::StringBuilderAppend,
        "StringBuilder::appendBetween" => Idiom::StringBuilderAppendBetween,
        "StringBuilder::toString" => Idiom::StringBuilderToString,
        _ => return None,
    };
    Some(idiom)
}

/// Name exported by the support library for a connected key: the first
/// segment lower-cased at its first letter, later segments title-cased.
///
/// `Date::getYear` becomes `dateGetYear`.
pub fn connected_key_to_exported_name(key: &str) -> String {
    key.split("::")
        .enumerate()
        .map(|(i, segment)| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if i == 0 => first.to_ascii_lowercase().to_string() + chars.as_str(),
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn resolve_value(key: &str, genre: Genre) -> Option<SupportCode> {
    if let Some(idiom) = custom_idiom(key, genre) {
        return Some(SupportCode::Inline(InlineExpansion::new(connected_key_to_exported_name(key), idiom)));
    }
    if AUTO_SUPPORTED.contains(key) {
        return Some(SupportCode::External(ExternalReference::core(connected_key_to_exported_name(key))));
    }
    if let Some(name) = REMAPPED.get(key) {
        return Some(SupportCode::External(ExternalReference::core(*name)));
    }
    trace!(key, "connected key has no binding");
    None
}

/// Like `resolve_value`, but a missing binding is an error at `span`.
pub fn resolve_value_strict(key: &str, genre: Genre, span: Span) -> Result<SupportCode, BackendError> {
    resolve_value(key, genre).ok_or_else(|| BackendError::UnknownConnectedKey { key: key.to_string(), span })
}

/// Type for a connected type key, plus the type arguments to render with it.
/// Types resolve the same way in every genre.
pub fn resolve_type(key: &str, _genre: Genre, ty: &IrType) -> Option<(TypeReference, Vec<IrType>)> {
    let bindings = ty.bindings.clone();
    let resolved = match key {
        "Date" | "Promise" => (TypeReference::global(key), bindings),
        "PromiseBuilder" => (TypeReference::External(ExternalReference::core("PromiseBuilder")), bindings),
        // A one-element array whose element accumulates the text.
        "StringBuilder" => (TypeReference::global("Array"), vec![IrType::string()]),
        "StringIndexOption" | "StringIndex" | "NoStringIndex" => (TypeReference::global("number"), bindings),
        _ => {
            trace!(key, "connected type has no binding");
            return None;
        }
    };
    Some(resolved)
}

/// Runtime check for a cast to the named type, when it needs one.
pub fn resolve_cast(type_name: &str) -> Option<SupportCode> {
    let stable_name = match type_name {
        "StringIndex" => "requireStringIndex",
        "NoStringIndex" => "requireNoStringIndex",
        _ => return None,
    };
    Some(SupportCode::External(ExternalReference {
        library: LibraryId::CORE,
        stable_name: JsIdentifierName::new(stable_name),
        operator: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::{Expr, Tree, render_expression};
    use crate::support::ExternalReferenceRegistry;

    fn stable(key: &str) -> Option<(String, &'static str)> {
        resolve_value(key, Genre::Library).map(|code| (code.stable_name().to_string(), code.kind_name()))
    }

    #[test]
    fn test_exported_names() {
        assert_eq!(connected_key_to_exported_name("Date::getYear"), "dateGetYear");
        assert_eq!(connected_key_to_exported_name("StringIndexOption::compareTo::eq"), "stringIndexOptionCompareToEq");
        assert_eq!(connected_key_to_exported_name("stdNetSend"), "stdNetSend");
        assert_eq!(connected_key_to_exported_name("::getConsole"), "GetConsole");
    }

    #[test]
    fn test_lookup_order() {
        assert_eq!(stable("Date::getYear"), Some(("dateGetYear".to_string(), "inline")));
        assert_eq!(stable("Listed::join"), Some(("listedJoin".to_string(), "external")));
        assert_eq!(stable("List::get"), Some(("listedGet".to_string(), "external")));
        assert_eq!(stable("Date::today"), Some(("dateToday".to_string(), "external")));
        // Custom expansion wins over the auto-supported entry.
        assert_eq!(stable("Mapped::length"), Some(("mappedLength".to_string(), "inline")));
        assert_eq!(stable("Frobnicator::frob"), None);
    }

    #[test]
    fn test_strict_lookup_error_points_at_call_site() {
        let span = Span::new(3, 9, 0);
        match resolve_value_strict("Nope::nope", Genre::Library, span) {
            Err(BackendError::UnknownConnectedKey { key, span: at }) => {
                assert_eq!(key, "Nope::nope");
                assert_eq!(at, span);
            }
            other => panic!("expected unknown key error, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_connected_invocation() {
        let registry = ExternalReferenceRegistry::new();
        let code = resolve_value("String::slice", Genre::Library).unwrap();
        let args: Vec<Tree> = ["s", "a", "b"]
            .iter()
            .map(|n| Tree::Expr(Expr::ident(Span::new(0, 1, 0), *n)))
            .collect();
        let e = code.invoke(Span::new(0, 10, 0), &args, Genre::Library, Some(&registry));
        assert_eq!(render_expression(&e), "s.substring(a, b)");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_external_connected_invocation() {
        let registry = ExternalReferenceRegistry::new();
        let code = resolve_value("Date::today", Genre::Library).unwrap();
        let e = code.invoke(Span::new(0, 10, 0), &[], Genre::Library, Some(&registry));
        assert_eq!(render_expression(&e), "dateToday__0()");
    }

    #[test]
    fn test_date_constructor_follows_genre() {
        let docs = resolve_value("Date::constructor", Genre::Documentation).unwrap();
        assert_eq!(docs.render_standalone(), "new Date(Date.UTC(1900, 0, 1))");
    }

    #[test]
    fn test_types() {
        let ty = IrType::with_bindings("Promise", vec![IrType::named("Int32")]);
        let (reference, bindings) = resolve_type("Promise", Genre::Library, &ty).unwrap();
        assert_eq!(reference, TypeReference::global("Promise"));
        assert_eq!(bindings, vec![IrType::named("Int32")]);

        let (reference, bindings) = resolve_type("StringBuilder", Genre::Library, &IrType::named("StringBuilder")).unwrap();
        assert_eq!(reference, TypeReference::global("Array"));
        assert_eq!(bindings, vec![IrType::string()]);

        assert!(matches!(resolve_type("PromiseBuilder", Genre::Library, &ty), Some((TypeReference::External(_), _))));
        assert!(resolve_type("Widget", Genre::Library, &ty).is_none());
    }

    #[test]
    fn test_types_ignore_genre() {
        let ty = IrType::with_bindings("Promise", vec![IrType::string()]);
        for key in ["Date", "Promise", "PromiseBuilder", "StringBuilder", "StringIndex", "Widget"] {
            assert_eq!(resolve_type(key, Genre::Library, &ty), resolve_type(key, Genre::Documentation, &ty), "{}", key);
        }
    }

    #[test]
    fn test_casts() {
        assert_eq!(resolve_cast("StringIndex").map(|c| c.stable_name().to_string()).as_deref(), Some("requireStringIndex"));
        assert_eq!(
            resolve_cast("NoStringIndex").map(|c| c.stable_name().to_string()).as_deref(),
            Some("requireNoStringIndex")
        );
        assert!(resolve_cast("String").is_none());
    }
}
