// Attribute-grammar evaluator for the C-minus parse tree

use tracing::debug;

use crate::parser::grammar::Sign;
use crate::parser::lexer::TokenKind;
use crate::parser::rules::{NonTerminal, ProductionId};
use crate::parser::tree::ParseTreeNode;

use super::code::{BinOp, Instruction};
use super::errors::SemanticError;
use super::symbols::{BaseType, Scope, SymbolTables};
use super::temps::TempNameGenerator;

pub type Node = ParseTreeNode<TokenKind, NonTerminal>;

/// `type ID` of a declaration, handed to the follow that completes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub name: String,
    pub ty: BaseType,
    pub line: usize,
}

/// An identifier occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub line: usize,
}

/// Attributes pushed down to a child before it is visited
#[derive(Debug, Clone, Default)]
pub struct Inherited {
    /// Table that declarations go into and lookups start from
    pub scope: Scope,
    /// Set on `define-type` and `fun-define-follow`
    pub declarator: Option<Declarator>,
    /// Assignment or call target, set on `normal-statement-follow`
    pub target: Option<Ident>,
}

impl Inherited {
    fn scoped(scope: Scope) -> Self {
        Inherited {
            scope,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub line: usize,
    pub array: bool,
}

/// What follows an identifier: a subscript or an argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    Index {
        place: String,
        constant: Option<i64>,
    },
    Call(Vec<String>),
}

/// Attributes a node synthesizes for its parent.
///
/// Only the fields relevant to a node's non-terminal are filled in; the rest
/// stay at their defaults.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    /// Matched text (terminals)
    pub lexeme: String,
    pub line: usize,
    /// Instructions, children's code first
    pub code: Vec<Instruction>,
    /// Name holding the value of an expression
    pub place: String,
    /// Value of an integer literal, possibly parenthesized
    pub constant: Option<i64>,
    pub ty: Option<BaseType>,
    /// Declared array length (`var-define-follow`)
    pub length: Option<usize>,
    pub is_array: bool,
    pub params: Vec<ParamDecl>,
    pub args: Vec<String>,
    pub operator: Option<BinOp>,
    /// Pending `(operator, operand)` pairs of an operator chain
    pub tail: Vec<(BinOp, String)>,
    pub suffix: Option<Suffix>,
}

impl Attributes {
    fn leaf(node: &Node) -> Self {
        Attributes {
            lexeme: node.lexeme().to_string(),
            place: node.lexeme().to_string(),
            line: node.line,
            ..Default::default()
        }
    }

    pub(crate) fn with_code(code: Vec<Instruction>) -> Self {
        Attributes {
            code,
            ..Default::default()
        }
    }

    fn concat(children: Vec<Attributes>) -> Self {
        Self::with_code(children.into_iter().flat_map(|c| c.code).collect())
    }

    fn operator(op: BinOp) -> Self {
        Attributes {
            operator: Some(op),
            ..Default::default()
        }
    }
}

/// Move the attributes of child `index` out of `children`.
pub(crate) fn take(children: &mut [Attributes], index: usize) -> Attributes {
    children
        .get_mut(index)
        .map(std::mem::take)
        .unwrap_or_default()
}

/// Result of one evaluation run
#[derive(Debug)]
pub struct Evaluation {
    pub code: Vec<Instruction>,
    pub errors: Vec<SemanticError>,
    pub symbols: SymbolTables,
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A non-terminal whose children are being visited
struct Frame<'t> {
    node: &'t Node,
    id: ProductionId,
    inherited: Inherited,
    /// Synthesized attributes of the children visited so far
    done: Vec<Attributes>,
    /// Code of the list items already folded into this frame
    prefix: Vec<Instruction>,
}

enum Visit<'t> {
    Done(Attributes),
    Open(Frame<'t>),
}

impl<'t> Frame<'t> {
    fn visit(node: &'t Node, inherited: Inherited) -> Visit<'t> {
        match node.sign {
            Sign::Terminal(_) => Visit::Done(Attributes::leaf(node)),
            Sign::NonTerminal(_) => match node.production.and_then(ProductionId::from_index) {
                Some(id) => Visit::Open(Frame {
                    node,
                    id,
                    inherited,
                    done: Vec::with_capacity(node.children.len()),
                    prefix: Vec::new(),
                }),
                None => Visit::Done(Attributes::default()),
            },
            Sign::Epsilon | Sign::End => Visit::Done(Attributes::default()),
        }
    }

    /// `next` is the tail of the list this frame is expanding.
    fn continues_list(&self, next: &Frame<'t>) -> bool {
        matches!(
            self.id,
            ProductionId::DefineList | ProductionId::LocalDefineList | ProductionId::CodeList
        ) && next.node.sign == self.node.sign
    }

    /// Keep the code of the items seen so far and carry on with the tail.
    fn continue_with(&mut self, next: Frame<'t>) {
        for attributes in self.done.drain(..) {
            self.prefix.extend(attributes.code);
        }
        self.node = next.node;
        self.id = next.id;
        self.inherited = next.inherited;
    }
}

/// Walks a parse tree once, threading inherited attributes down and
/// synthesized attributes up.
///
/// For every node the walk asks [`Evaluator::inherit`] for each child's
/// inherited attributes immediately before visiting that child, so a child may
/// depend on its left siblings' results. Once all children are done their
/// synthesized attributes are combined by the production's action.
///
/// All run state (symbol tables, name counters, accumulated errors) lives on
/// the evaluator; a new evaluator starts from scratch.
#[derive(Debug, Default)]
pub struct Evaluator {
    pub(crate) symbols: SymbolTables,
    pub(crate) temps: TempNameGenerator,
    pub(crate) errors: Vec<SemanticError>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the tree rooted at `root`, consuming the evaluator.
    pub fn evaluate(mut self, root: &Node) -> Evaluation {
        let attributes = self.walk(root);
        debug!(
            instructions = attributes.code.len(),
            errors = self.errors.len(),
            temps = self.temps.temps_issued(),
            labels = self.temps.labels_issued(),
            "evaluation complete"
        );
        Evaluation {
            code: attributes.code,
            errors: self.errors,
            symbols: self.symbols,
        }
    }

    /// Visit the tree with an explicit frame stack. The tail of a
    /// `define-list`, `local-define-list` or `code-list` reuses its parent's
    /// frame, so the stack depth is bounded by nesting and list code is
    /// appended once per item.
    fn walk(&mut self, root: &Node) -> Attributes {
        let mut stack = match Frame::visit(root, Inherited::default()) {
            Visit::Done(attributes) => return attributes,
            Visit::Open(frame) => vec![frame],
        };

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            let node = frame.node;
            let index = frame.done.len();
            if let Some(child) = node.children.get(index) {
                let inherited = self.inherit(frame.id, &frame.inherited, &frame.done, index);
                match Frame::visit(child, inherited) {
                    Visit::Done(attributes) => frame.done.push(attributes),
                    Visit::Open(next) if frame.continues_list(&next) => frame.continue_with(next),
                    Visit::Open(next) => stack.push(next),
                }
                continue;
            }

            let Some(finished) = stack.pop() else {
                break;
            };
            let mut attributes = self.synthesize(finished.id, &finished.inherited, finished.done);
            if !finished.prefix.is_empty() {
                let mut code = finished.prefix;
                code.append(&mut attributes.code);
                attributes.code = code;
            }

            match stack.last_mut() {
                Some(parent) => parent.done.push(attributes),
                None => return attributes,
            }
        }

        Attributes::default()
    }

    /// Inherited attributes of child `index`, given the parent's and those
    /// synthesized by the children before it.
    fn inherit(
        &mut self,
        id: ProductionId,
        inherited: &Inherited,
        done: &[Attributes],
        index: usize,
    ) -> Inherited {
        let mut child = Inherited::scoped(inherited.scope);

        match (id, index) {
            // type ID . define-type
            (ProductionId::Define, 2) => {
                if let [ty, name] = done {
                    child.declarator = Some(Declarator {
                        name: name.lexeme.clone(),
                        ty: ty.ty.unwrap_or(BaseType::Int),
                        line: name.line,
                    });
                }
            }
            (ProductionId::DefineTypeVar | ProductionId::DefineTypeFun, 0) => {
                child.declarator = inherited.declarator.clone();
            }
            // ( params ) . code-block
            (ProductionId::FunDefineFollow, 3) => {
                let params = done.get(1).map(|p| p.params.as_slice()).unwrap_or(&[]);
                child.scope = self.enter_function(inherited, params);
            }
            // ID . normal-statement-follow
            (ProductionId::NormalStatementId, 1) => {
                child.target = done.first().map(|name| Ident {
                    name: name.lexeme.clone(),
                    line: name.line,
                });
            }
            _ => {}
        }

        child
    }

    fn synthesize(
        &mut self,
        id: ProductionId,
        inherited: &Inherited,
        mut children: Vec<Attributes>,
    ) -> Attributes {
        use ProductionId as P;

        match id {
            P::Program
            | P::DefineList
            | P::Define
            | P::CodeBlock
            | P::LocalDefineList
            | P::CodeList
            | P::NormalStatementId
            | P::Return => Attributes::concat(children),

            P::DefineListEmpty
            | P::VarDefineScalar
            | P::ParamsVoid
            | P::ParamsEmpty
            | P::ParamFollowEmpty
            | P::ArraySubscriptEmpty
            | P::LocalDefineListEmpty
            | P::CodeListEmpty
            | P::NormalStatementEmpty
            | P::SelectionEmpty
            | P::VarFollowEmpty
            | P::ExpressionFollowEmpty
            | P::AdditiveFollowEmpty
            | P::TermFollowEmpty
            | P::ArgsEmpty
            | P::ArgListFollowEmpty => Attributes::default(),

            P::DefineTypeFun
            | P::ParamsList
            | P::CodeNormal
            | P::CodeSelection
            | P::CodeIteration
            | P::CodeReturn
            | P::IterationCode
            | P::IdFactorVar
            | P::Args => take(&mut children, 0),

            P::CallFollow | P::IterationBlock | P::FactorParen => take(&mut children, 1),
            P::SelectionElse => take(&mut children, 2),

            // Declarations
            P::DefineTypeVar => self.define_global(inherited, &children),
            P::VarDefineArray => Self::array_length(&children),
            P::TypeInt => Attributes {
                ty: Some(BaseType::Int),
                ..Default::default()
            },
            P::TypeVoid => Attributes {
                ty: Some(BaseType::Void),
                ..Default::default()
            },
            P::FunDefineFollow => Self::function_body(inherited, children),
            P::ParamList => Self::param_list(children, 0),
            P::ParamFollow => Self::param_list(children, 1),
            P::Param => Self::param(&children),
            P::ArraySubscript => Attributes {
                is_array: true,
                ..Default::default()
            },
            P::LocalVarDefine => self.define_local(inherited, &children),

            // Statements
            P::NormalFollowAssign => self.assignment(inherited, children),
            P::NormalFollowCall => self.call_statement(inherited, children),
            P::Selection => self.selection(children),
            P::Iteration => self.iteration(children),
            P::ReturnVoid => Attributes::with_code(vec![Instruction::Return(None)]),
            P::ReturnValue => Self::return_value(children),

            // Expressions
            P::VarFollowIndex => Self::subscript(children),
            P::Expression => self.relational(children),
            P::ExpressionFollow => Self::relational_follow(children),
            P::AdditiveExpr | P::Term => self.fold_chain(children),
            P::AdditiveFollow | P::TermFollow => Self::chain_link(children),
            P::RelOpLe => Attributes::operator(BinOp::Le),
            P::RelOpLt => Attributes::operator(BinOp::Lt),
            P::RelOpGt => Attributes::operator(BinOp::Gt),
            P::RelOpGe => Attributes::operator(BinOp::Ge),
            P::RelOpEq => Attributes::operator(BinOp::Eq),
            P::RelOpNe => Attributes::operator(BinOp::Ne),
            P::AddOpPlus => Attributes::operator(BinOp::Add),
            P::AddOpMinus => Attributes::operator(BinOp::Sub),
            P::MulOpStar => Attributes::operator(BinOp::Mul),
            P::MulOpSlash => Attributes::operator(BinOp::Div),
            P::FactorId => self.identifier_factor(inherited, children),
            P::FactorNum => Self::number(children),
            P::IdFactorCall => Self::call_suffix(children),
            P::ArgList => Self::arg_list(children, 0),
            P::ArgListFollow => Self::arg_list(children, 1),
        }
    }
}
