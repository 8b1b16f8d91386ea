//! The C-minus grammar
//!
//! [`ProductionId`] has one variant per production, declared in the same order
//! as the productions of [`grammar`], so a production index recorded on a
//! parse-tree node maps back to its variant with [`ProductionId::from_index`].
//! The semantic evaluator dispatches on these variants with an exhaustive
//! match.

use std::fmt;

use super::grammar::{Grammar, GrammarError, Production, Sign};
use super::lexer::TokenKind;

pub type CSign = Sign<TokenKind, NonTerminal>;
pub type CGrammar = Grammar<TokenKind, NonTerminal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NonTerminal {
    Program,
    DefineList,
    Define,
    DefineType,
    VarDefineFollow,
    Type,
    FunDefineFollow,
    Params,
    ParamList,
    ParamFollow,
    Param,
    ArraySubscript,
    CodeBlock,
    LocalDefineList,
    LocalVarDefine,
    CodeList,
    Code,
    NormalStatement,
    NormalStatementFollow,
    CallFollow,
    SelectionStatement,
    SelectionFollow,
    IterationStatement,
    IterationFollow,
    ReturnStatement,
    ReturnFollow,
    VarFollow,
    Expression,
    ExpressionFollow,
    RelOp,
    AdditiveExpr,
    AdditiveExprFollow,
    AddOp,
    Term,
    TermFollow,
    MulOp,
    Factor,
    IdFactorFollow,
    Args,
    ArgList,
    ArgListFollow,
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NonTerminal::Program => "program",
            NonTerminal::DefineList => "define-list",
            NonTerminal::Define => "define",
            NonTerminal::DefineType => "define-type",
            NonTerminal::VarDefineFollow => "var-define-follow",
            NonTerminal::Type => "type",
            NonTerminal::FunDefineFollow => "fun-define-follow",
            NonTerminal::Params => "params",
            NonTerminal::ParamList => "param-list",
            NonTerminal::ParamFollow => "param-follow",
            NonTerminal::Param => "param",
            NonTerminal::ArraySubscript => "array-subscript",
            NonTerminal::CodeBlock => "code-block",
            NonTerminal::LocalDefineList => "local-define-list",
            NonTerminal::LocalVarDefine => "local-var-define",
            NonTerminal::CodeList => "code-list",
            NonTerminal::Code => "code",
            NonTerminal::NormalStatement => "normal-statement",
            NonTerminal::NormalStatementFollow => "normal-statement-follow",
            NonTerminal::CallFollow => "call-follow",
            NonTerminal::SelectionStatement => "selection-statement",
            NonTerminal::SelectionFollow => "selection-follow",
            NonTerminal::IterationStatement => "iteration-statement",
            NonTerminal::IterationFollow => "iteration-follow",
            NonTerminal::ReturnStatement => "return-statement",
            NonTerminal::ReturnFollow => "return-follow",
            NonTerminal::VarFollow => "var-follow",
            NonTerminal::Expression => "expression",
            NonTerminal::ExpressionFollow => "expression-follow",
            NonTerminal::RelOp => "rel-op",
            NonTerminal::AdditiveExpr => "additive-expr",
            NonTerminal::AdditiveExprFollow => "additive-expr-follow",
            NonTerminal::AddOp => "add-op",
            NonTerminal::Term => "term",
            NonTerminal::TermFollow => "term-follow",
            NonTerminal::MulOp => "mul-op",
            NonTerminal::Factor => "factor",
            NonTerminal::IdFactorFollow => "id-factor-follow",
            NonTerminal::Args => "args",
            NonTerminal::ArgList => "arg-list",
            NonTerminal::ArgListFollow => "arg-list-follow",
        };
        f.write_str(name)
    }
}

/// One variant per production, in grammar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductionId {
    Program,
    DefineList,
    DefineListEmpty,
    Define,
    DefineTypeVar,
    DefineTypeFun,
    VarDefineScalar,
    VarDefineArray,
    TypeInt,
    TypeVoid,
    FunDefineFollow,
    ParamsList,
    ParamsVoid,
    ParamsEmpty,
    ParamList,
    ParamFollow,
    ParamFollowEmpty,
    Param,
    ArraySubscript,
    ArraySubscriptEmpty,
    CodeBlock,
    LocalDefineList,
    LocalDefineListEmpty,
    LocalVarDefine,
    CodeList,
    CodeListEmpty,
    CodeNormal,
    CodeSelection,
    CodeIteration,
    CodeReturn,
    NormalStatementEmpty,
    NormalStatementId,
    NormalFollowAssign,
    NormalFollowCall,
    CallFollow,
    Selection,
    SelectionElse,
    SelectionEmpty,
    Iteration,
    IterationBlock,
    IterationCode,
    Return,
    ReturnVoid,
    ReturnValue,
    VarFollowIndex,
    VarFollowEmpty,
    Expression,
    ExpressionFollow,
    ExpressionFollowEmpty,
    RelOpLe,
    RelOpLt,
    RelOpGt,
    RelOpGe,
    RelOpEq,
    RelOpNe,
    AdditiveExpr,
    AdditiveFollow,
    AdditiveFollowEmpty,
    AddOpPlus,
    AddOpMinus,
    Term,
    TermFollow,
    TermFollowEmpty,
    MulOpStar,
    MulOpSlash,
    FactorParen,
    FactorId,
    FactorNum,
    IdFactorVar,
    IdFactorCall,
    Args,
    ArgsEmpty,
    ArgList,
    ArgListFollow,
    ArgListFollowEmpty,
}

fn t(kind: TokenKind) -> CSign {
    Sign::Terminal(kind)
}

fn n(non_terminal: NonTerminal) -> CSign {
    Sign::NonTerminal(non_terminal)
}

impl ProductionId {
    pub const ALL: [ProductionId; 75] = [
        ProductionId::Program,
        ProductionId::DefineList,
        ProductionId::DefineListEmpty,
        ProductionId::Define,
        ProductionId::DefineTypeVar,
        ProductionId::DefineTypeFun,
        ProductionId::VarDefineScalar,
        ProductionId::VarDefineArray,
        ProductionId::TypeInt,
        ProductionId::TypeVoid,
        ProductionId::FunDefineFollow,
        ProductionId::ParamsList,
        ProductionId::ParamsVoid,
        ProductionId::ParamsEmpty,
        ProductionId::ParamList,
        ProductionId::ParamFollow,
        ProductionId::ParamFollowEmpty,
        ProductionId::Param,
        ProductionId::ArraySubscript,
        ProductionId::ArraySubscriptEmpty,
        ProductionId::CodeBlock,
        ProductionId::LocalDefineList,
        ProductionId::LocalDefineListEmpty,
        ProductionId::LocalVarDefine,
        ProductionId::CodeList,
        ProductionId::CodeListEmpty,
        ProductionId::CodeNormal,
        ProductionId::CodeSelection,
        ProductionId::CodeIteration,
        ProductionId::CodeReturn,
        ProductionId::NormalStatementEmpty,
        ProductionId::NormalStatementId,
        ProductionId::NormalFollowAssign,
        ProductionId::NormalFollowCall,
        ProductionId::CallFollow,
        ProductionId::Selection,
        ProductionId::SelectionElse,
        ProductionId::SelectionEmpty,
        ProductionId::Iteration,
        ProductionId::IterationBlock,
        ProductionId::IterationCode,
        ProductionId::Return,
        ProductionId::ReturnVoid,
        ProductionId::ReturnValue,
        ProductionId::VarFollowIndex,
        ProductionId::VarFollowEmpty,
        ProductionId::Expression,
        ProductionId::ExpressionFollow,
        ProductionId::ExpressionFollowEmpty,
        ProductionId::RelOpLe,
        ProductionId::RelOpLt,
        ProductionId::RelOpGt,
        ProductionId::RelOpGe,
        ProductionId::RelOpEq,
        ProductionId::RelOpNe,
        ProductionId::AdditiveExpr,
        ProductionId::AdditiveFollow,
        ProductionId::AdditiveFollowEmpty,
        ProductionId::AddOpPlus,
        ProductionId::AddOpMinus,
        ProductionId::Term,
        ProductionId::TermFollow,
        ProductionId::TermFollowEmpty,
        ProductionId::MulOpStar,
        ProductionId::MulOpSlash,
        ProductionId::FactorParen,
        ProductionId::FactorId,
        ProductionId::FactorNum,
        ProductionId::IdFactorVar,
        ProductionId::IdFactorCall,
        ProductionId::Args,
        ProductionId::ArgsEmpty,
        ProductionId::ArgList,
        ProductionId::ArgListFollow,
        ProductionId::ArgListFollowEmpty,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The production this variant stands for.
    pub fn rule(self) -> Production<TokenKind, NonTerminal> {
        use NonTerminal as N;
        use TokenKind as K;

        let (left, right) = match self {
            ProductionId::Program => (N::Program, vec![n(N::DefineList)]),
            ProductionId::DefineList => (N::DefineList, vec![n(N::Define), n(N::DefineList)]),
            ProductionId::DefineListEmpty => (N::DefineList, vec![]),
            ProductionId::Define => (
                N::Define,
                vec![n(N::Type), t(K::Ident), n(N::DefineType)],
            ),
            ProductionId::DefineTypeVar => (N::DefineType, vec![n(N::VarDefineFollow)]),
            ProductionId::DefineTypeFun => (N::DefineType, vec![n(N::FunDefineFollow)]),
            ProductionId::VarDefineScalar => (N::VarDefineFollow, vec![t(K::Semicolon)]),
            ProductionId::VarDefineArray => (
                N::VarDefineFollow,
                vec![
                    t(K::LBracket),
                    t(K::Num),
                    t(K::RBracket),
                    t(K::Semicolon),
                ],
            ),
            ProductionId::TypeInt => (N::Type, vec![t(K::Int)]),
            ProductionId::TypeVoid => (N::Type, vec![t(K::Void)]),
            ProductionId::FunDefineFollow => (
                N::FunDefineFollow,
                vec![
                    t(K::LParen),
                    n(N::Params),
                    t(K::RParen),
                    n(N::CodeBlock),
                ],
            ),
            ProductionId::ParamsList => (N::Params, vec![n(N::ParamList)]),
            ProductionId::ParamsVoid => (N::Params, vec![t(K::Void)]),
            ProductionId::ParamsEmpty => (N::Params, vec![]),
            ProductionId::ParamList => (N::ParamList, vec![n(N::Param), n(N::ParamFollow)]),
            ProductionId::ParamFollow => (
                N::ParamFollow,
                vec![t(K::Comma), n(N::Param), n(N::ParamFollow)],
            ),
            ProductionId::ParamFollowEmpty => (N::ParamFollow, vec![]),
            ProductionId::Param => (
                N::Param,
                vec![t(K::Int), t(K::Ident), n(N::ArraySubscript)],
            ),
            ProductionId::ArraySubscript => {
                (N::ArraySubscript, vec![t(K::LBracket), t(K::RBracket)])
            }
            ProductionId::ArraySubscriptEmpty => (N::ArraySubscript, vec![]),
            ProductionId::CodeBlock => (
                N::CodeBlock,
                vec![
                    t(K::LBrace),
                    n(N::LocalDefineList),
                    n(N::CodeList),
                    t(K::RBrace),
                ],
            ),
            ProductionId::LocalDefineList => (
                N::LocalDefineList,
                vec![n(N::LocalVarDefine), n(N::LocalDefineList)],
            ),
            ProductionId::LocalDefineListEmpty => (N::LocalDefineList, vec![]),
            ProductionId::LocalVarDefine => (
                N::LocalVarDefine,
                vec![n(N::Type), t(K::Ident), n(N::VarDefineFollow)],
            ),
            ProductionId::CodeList => (N::CodeList, vec![n(N::Code), n(N::CodeList)]),
            ProductionId::CodeListEmpty => (N::CodeList, vec![]),
            ProductionId::CodeNormal => (N::Code, vec![n(N::NormalStatement)]),
            ProductionId::CodeSelection => (N::Code, vec![n(N::SelectionStatement)]),
            ProductionId::CodeIteration => (N::Code, vec![n(N::IterationStatement)]),
            ProductionId::CodeReturn => (N::Code, vec![n(N::ReturnStatement)]),
            ProductionId::NormalStatementEmpty => (N::NormalStatement, vec![t(K::Semicolon)]),
            ProductionId::NormalStatementId => (
                N::NormalStatement,
                vec![t(K::Ident), n(N::NormalStatementFollow)],
            ),
            ProductionId::NormalFollowAssign => (
                N::NormalStatementFollow,
                vec![
                    n(N::VarFollow),
                    t(K::Assign),
                    n(N::Expression),
                    t(K::Semicolon),
                ],
            ),
            ProductionId::NormalFollowCall => (
                N::NormalStatementFollow,
                vec![n(N::CallFollow), t(K::Semicolon)],
            ),
            ProductionId::CallFollow => (
                N::CallFollow,
                vec![t(K::LParen), n(N::Args), t(K::RParen)],
            ),
            ProductionId::Selection => (
                N::SelectionStatement,
                vec![
                    t(K::If),
                    t(K::LParen),
                    n(N::Expression),
                    t(K::RParen),
                    t(K::LBrace),
                    n(N::CodeList),
                    t(K::RBrace),
                    n(N::SelectionFollow),
                ],
            ),
            ProductionId::SelectionElse => (
                N::SelectionFollow,
                vec![t(K::Else), t(K::LBrace), n(N::CodeList), t(K::RBrace)],
            ),
            ProductionId::SelectionEmpty => (N::SelectionFollow, vec![]),
            ProductionId::Iteration => (
                N::IterationStatement,
                vec![
                    t(K::While),
                    t(K::LParen),
                    n(N::Expression),
                    t(K::RParen),
                    n(N::IterationFollow),
                ],
            ),
            ProductionId::IterationBlock => (
                N::IterationFollow,
                vec![t(K::LBrace), n(N::CodeList), t(K::RBrace)],
            ),
            ProductionId::IterationCode => (N::IterationFollow, vec![n(N::Code)]),
            ProductionId::Return => (
                N::ReturnStatement,
                vec![t(K::Return), n(N::ReturnFollow)],
            ),
            ProductionId::ReturnVoid => (N::ReturnFollow, vec![t(K::Semicolon)]),
            ProductionId::ReturnValue => {
                (N::ReturnFollow, vec![n(N::Expression), t(K::Semicolon)])
            }
            ProductionId::VarFollowIndex => (
                N::VarFollow,
                vec![t(K::LBracket), n(N::Expression), t(K::RBracket)],
            ),
            ProductionId::VarFollowEmpty => (N::VarFollow, vec![]),
            ProductionId::Expression => (
                N::Expression,
                vec![n(N::AdditiveExpr), n(N::ExpressionFollow)],
            ),
            ProductionId::ExpressionFollow => {
                (N::ExpressionFollow, vec![n(N::RelOp), n(N::AdditiveExpr)])
            }
            ProductionId::ExpressionFollowEmpty => (N::ExpressionFollow, vec![]),
            ProductionId::RelOpLe => (N::RelOp, vec![t(K::Le)]),
            ProductionId::RelOpLt => (N::RelOp, vec![t(K::Lt)]),
            ProductionId::RelOpGt => (N::RelOp, vec![t(K::Gt)]),
            ProductionId::RelOpGe => (N::RelOp, vec![t(K::Ge)]),
            ProductionId::RelOpEq => (N::RelOp, vec![t(K::EqEq)]),
            ProductionId::RelOpNe => (N::RelOp, vec![t(K::NotEq)]),
            ProductionId::AdditiveExpr => {
                (N::AdditiveExpr, vec![n(N::Term), n(N::AdditiveExprFollow)])
            }
            ProductionId::AdditiveFollow => (
                N::AdditiveExprFollow,
                vec![n(N::AddOp), n(N::Term), n(N::AdditiveExprFollow)],
            ),
            ProductionId::AdditiveFollowEmpty => (N::AdditiveExprFollow, vec![]),
            ProductionId::AddOpPlus => (N::AddOp, vec![t(K::Plus)]),
            ProductionId::AddOpMinus => (N::AddOp, vec![t(K::Minus)]),
            ProductionId::Term => (N::Term, vec![n(N::Factor), n(N::TermFollow)]),
            ProductionId::TermFollow => (
                N::TermFollow,
                vec![n(N::MulOp), n(N::Factor), n(N::TermFollow)],
            ),
            ProductionId::TermFollowEmpty => (N::TermFollow, vec![]),
            ProductionId::MulOpStar => (N::MulOp, vec![t(K::Star)]),
            ProductionId::MulOpSlash => (N::MulOp, vec![t(K::Slash)]),
            ProductionId::FactorParen => (
                N::Factor,
                vec![t(K::LParen), n(N::Expression), t(K::RParen)],
            ),
            ProductionId::FactorId => (N::Factor, vec![t(K::Ident), n(N::IdFactorFollow)]),
            ProductionId::FactorNum => (N::Factor, vec![t(K::Num)]),
            ProductionId::IdFactorVar => (N::IdFactorFollow, vec![n(N::VarFollow)]),
            ProductionId::IdFactorCall => (
                N::IdFactorFollow,
                vec![t(K::LParen), n(N::Args), t(K::RParen)],
            ),
            ProductionId::Args => (N::Args, vec![n(N::ArgList)]),
            ProductionId::ArgsEmpty => (N::Args, vec![]),
            ProductionId::ArgList => (
                N::ArgList,
                vec![n(N::Expression), n(N::ArgListFollow)],
            ),
            ProductionId::ArgListFollow => (
                N::ArgListFollow,
                vec![t(K::Comma), n(N::Expression), n(N::ArgListFollow)],
            ),
            ProductionId::ArgListFollowEmpty => (N::ArgListFollow, vec![]),
        };
        Production::new(left, right)
    }
}

/// Build the C-minus grammar, start symbol `program`.
pub fn grammar() -> Result<CGrammar, GrammarError> {
    Grammar::new(
        NonTerminal::Program,
        ProductionId::ALL.iter().map(|id| id.rule()).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::first_follow::FirstFollow;
    use crate::parser::table::ParseTable;

    #[test]
    fn test_ids_follow_grammar_order() {
        for (index, id) in ProductionId::ALL.iter().enumerate() {
            assert_eq!(id.index(), index);
            assert_eq!(ProductionId::from_index(index), Some(*id));
        }
        assert_eq!(ProductionId::from_index(ProductionId::ALL.len()), None);
    }

    #[test]
    fn test_grammar_is_ll1() {
        let g = grammar().unwrap();
        let sets = FirstFollow::compute(&g);
        let table = ParseTable::build(&g, &sets).unwrap();
        assert!(!table.is_empty());
        assert_eq!(g.productions().len(), ProductionId::ALL.len());
    }

    #[test]
    fn test_every_non_terminal_has_a_production() {
        let g = grammar().unwrap();
        assert_eq!(g.non_terminals().len(), 41);
        assert!(g.terminals().contains(&TokenKind::Ident));
        assert!(g.terminals().contains(&TokenKind::Num));
    }

    #[test]
    fn test_rule_shapes() {
        assert_eq!(ProductionId::Selection.rule().right.len(), 8);
        assert_eq!(ProductionId::Iteration.rule().right.len(), 5);
        assert_eq!(ProductionId::FunDefineFollow.rule().right.len(), 4);
        assert_eq!(ProductionId::NormalFollowAssign.rule().right.len(), 4);
        assert!(ProductionId::SelectionEmpty.rule().is_epsilon());
        assert_eq!(
            ProductionId::DefineList.rule().to_string(),
            "define-list -> define define-list"
        );
    }

    #[test]
    fn test_follow_sets() {
        let g = grammar().unwrap();
        let sets = FirstFollow::compute(&g);
        assert!(sets.follow_of(NonTerminal::Program).contains(&Sign::End));
        assert!(sets
            .follow_of(NonTerminal::SelectionFollow)
            .contains(&t(TokenKind::RBrace)));
        assert!(!sets
            .follow_of(NonTerminal::SelectionFollow)
            .contains(&t(TokenKind::Else)));
    }
}
