//!
//! Builtin Operator Identifiers
//!
//! The closed set of primitive operations the IR can contain. Every id has
//! an IR-level return kind, which the coercion layer uses to decide how a
//! native JS result must be narrowed.
//!

use std::fmt;
use std::str::FromStr;

macro_rules! builtin_operators {
    ($($id:ident),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum BuiltinOperatorId {
            $($id),+
        }

        impl BuiltinOperatorId {
            pub const ALL: &'static [BuiltinOperatorId] = &[$(BuiltinOperatorId::$id),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $(BuiltinOperatorId::$id => stringify!($id)),+
                }
            }
        }
    };
}

builtin_operators! {
    BooleanNegation,
    BitwiseAnd,
    BitwiseOr,
    IsNull,
    NotNull,
    DivFltFlt,
    DivIntInt,
    DivIntInt64,
    DivIntIntSafe,
    DivIntInt64Safe,
    ModFltFlt,
    ModIntInt,
    ModIntInt64,
    ModIntIntSafe,
    ModIntInt64Safe,
    MinusFlt,
    MinusFltFlt,
    MinusInt,
    MinusInt64,
    MinusIntInt,
    MinusIntInt64,
    PlusFltFlt,
    PlusIntInt,
    PlusIntInt64,
    TimesIntInt,
    TimesIntInt64,
    TimesFltFlt,
    PowFltFlt,
    LtFltFlt,
    LtIntInt,
    LtStrStr,
    LtGeneric,
    LeFltFlt,
    LeIntInt,
    LeStrStr,
    LeGeneric,
    GtFltFlt,
    GtIntInt,
    GtStrStr,
    GtGeneric,
    GeFltFlt,
    GeIntInt,
    GeStrStr,
    GeGeneric,
    EqFltFlt,
    EqIntInt,
    EqStrStr,
    EqGeneric,
    NeFltFlt,
    NeIntInt,
    NeStrStr,
    NeGeneric,
    CmpFltFlt,
    CmpIntInt,
    CmpStrStr,
    CmpGeneric,
    Bubble,
    Panic,
    Print,
    StrCat,
    Listify,
    Async,
    AdaptGeneratorFn,
    SafeAdaptGeneratorFn,
}

/// What an operator produces, as declared by the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Boolean,
    Int32,
    Int64,
    Float64,
    String,
    List,
    Void,
    Never,
    Any,
}

impl BuiltinOperatorId {
    pub fn return_kind(self) -> ReturnKind {
        use BuiltinOperatorId::*;
        match self {
            BooleanNegation | IsNull => ReturnKind::Boolean,
            NotNull => ReturnKind::Any,
            BitwiseAnd | BitwiseOr => ReturnKind::Int32,
            DivFltFlt | ModFltFlt | MinusFlt | MinusFltFlt | PlusFltFlt | TimesFltFlt
            | PowFltFlt => ReturnKind::Float64,
            DivIntInt | DivIntIntSafe | ModIntInt | ModIntIntSafe | MinusInt | MinusIntInt
            | PlusIntInt | TimesIntInt => ReturnKind::Int32,
            DivIntInt64 | DivIntInt64Safe | ModIntInt64 | ModIntInt64Safe | MinusInt64
            | MinusIntInt64 | PlusIntInt64 | TimesIntInt64 => ReturnKind::Int64,
            LtFltFlt | LtIntInt | LtStrStr | LtGeneric | LeFltFlt | LeIntInt | LeStrStr
            | LeGeneric | GtFltFlt | GtIntInt | GtStrStr | GtGeneric | GeFltFlt | GeIntInt
            | GeStrStr | GeGeneric | EqFltFlt | EqIntInt | EqStrStr | EqGeneric | NeFltFlt
            | NeIntInt | NeStrStr | NeGeneric => ReturnKind::Boolean,
            CmpFltFlt | CmpIntInt | CmpStrStr | CmpGeneric => ReturnKind::Int32,
            Bubble | Panic => ReturnKind::Never,
            Print | Async => ReturnKind::Void,
            StrCat => ReturnKind::String,
            Listify => ReturnKind::List,
            AdaptGeneratorFn | SafeAdaptGeneratorFn => ReturnKind::Any,
        }
    }

    /// Name exported by the runtime support library: `PlusIntInt` -> `plusIntInt`.
    pub fn exported_name(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for BuiltinOperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown builtin operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for BuiltinOperatorId {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinOperatorId::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}
