// Table-driven parser tests on the C-minus grammar

use std::collections::BTreeMap;

use cminus::compile::Frontend;
use cminus::parser::grammar::{Grammar, Sign, Token};
use cminus::parser::lexer::TokenKind;
use cminus::parser::rules::NonTerminal;

/// Small deterministic generator so derivations are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }
}

/// Minimal derivation height of every non-terminal
fn heights(grammar: &Grammar<TokenKind, NonTerminal>) -> BTreeMap<NonTerminal, usize> {
    let mut heights = BTreeMap::new();
    loop {
        let mut changed = false;
        for production in grammar.productions() {
            let mut height = Some(1);
            for sign in &production.right {
                if let Sign::NonTerminal(n) = sign {
                    height = match (height, heights.get(n)) {
                        (Some(h), Some(c)) => Some(usize::max(h, c + 1)),
                        _ => None,
                    };
                }
            }
            if let Some(h) = height {
                let entry = heights.entry(production.left).or_insert(usize::MAX);
                if h < *entry {
                    *entry = h;
                    changed = true;
                }
            }
        }
        if !changed {
            return heights;
        }
    }
}

fn production_height(
    heights: &BTreeMap<NonTerminal, usize>,
    right: &[Sign<TokenKind, NonTerminal>],
) -> usize {
    right
        .iter()
        .filter_map(|s| match s {
            Sign::NonTerminal(n) => heights.get(n).copied(),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

/// Leftmost derivation from the start symbol. Productions are picked at
/// random for the first `budget` expansions, then by minimal height.
fn derive(frontend: &Frontend, seed: u64, budget: usize) -> Vec<Token<TokenKind>> {
    let grammar = frontend.grammar();
    let heights = heights(grammar);
    let mut rng = Lcg(seed);
    let mut stack = vec![Sign::NonTerminal(grammar.start())];
    let mut tokens = Vec::new();
    let mut expansions = 0;

    while let Some(sign) = stack.pop() {
        match sign {
            Sign::Terminal(kind) => {
                let lexeme = match kind {
                    TokenKind::Ident => "x".to_string(),
                    TokenKind::Num => "1".to_string(),
                    other => other.to_string().trim_matches('\'').to_string(),
                };
                let line = tokens.len() + 1;
                tokens.push(Token::new(kind, lexeme, line));
            }
            Sign::NonTerminal(n) => {
                let candidates: Vec<_> = grammar.productions_of(n).map(|(_, p)| p).collect();
                let chosen = if expansions < budget {
                    candidates[rng.next() % candidates.len()]
                } else {
                    candidates
                        .iter()
                        .min_by_key(|p| production_height(&heights, &p.right))
                        .copied()
                        .unwrap()
                };
                expansions += 1;
                stack.extend(chosen.right.iter().rev().copied());
            }
            Sign::Epsilon | Sign::End => {}
        }
    }

    tokens
}

#[test]
fn test_derived_programs_are_accepted() {
    let frontend = Frontend::new().unwrap();

    for seed in 0..200 {
        let tokens = derive(&frontend, seed, 60);
        let tree = frontend
            .parse_tokens(&tokens)
            .unwrap_or_else(|e| panic!("seed {}: {}", seed, e));

        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(tree.leaves(), kinds, "seed {}", seed);
        assert!(tree.conforms_to(frontend.grammar()), "seed {}", seed);
    }
}

#[test]
fn test_single_token_mutations_fail_at_or_after_mutation() {
    let frontend = Frontend::new().unwrap();
    let replacements = [
        TokenKind::Ident,
        TokenKind::Num,
        TokenKind::Semicolon,
        TokenKind::LParen,
        TokenKind::RBrace,
        TokenKind::Int,
        TokenKind::Else,
        TokenKind::Plus,
    ];

    for seed in 0..20 {
        let tokens = derive(&frontend, seed, 40);
        for position in 0..tokens.len() {
            for kind in replacements {
                let mut mutated = tokens.clone();
                mutated[position].kind = kind;
                if let Err(e) = frontend.parse_tokens(&mutated) {
                    assert!(
                        e.line() > position,
                        "seed {}: mutation at {} reported at line {}",
                        seed,
                        position,
                        e.line()
                    );
                }
            }
        }
    }
}

#[test]
fn test_stray_bracket_reported_at_its_own_line() {
    let frontend = Frontend::new().unwrap();
    let source = r#"
        int g;
        int f(int a, int b) {
            int s;
            s = a + b * 2;
            if (s > 3) { s = s - 1; } else { f(s, 1); }
            while (s != 0) s = s / 2;
            return s;
        }
        void main(void) { f(1, 2); return; }
    "#;

    // One token per line, so a line names a position.
    let mut tokens = frontend.tokenize(source).unwrap();
    for (i, token) in tokens.iter_mut().enumerate() {
        token.line = i + 1;
    }
    assert!(frontend.parse_tokens(&tokens).is_ok());
    assert!(tokens.iter().all(|t| t.kind != TokenKind::LBracket));

    // Without a '[' no production that expects ']' is ever expanded, so the
    // replaced token is always the offending one.
    for position in 0..tokens.len() {
        let mut mutated = tokens.clone();
        mutated[position] = Token::new(TokenKind::RBracket, "]", position + 1);
        let err = frontend.parse_tokens(&mutated).unwrap_err();
        assert_eq!(err.line(), position + 1, "{}", err);
    }
}

#[test]
fn test_empty_source_is_an_empty_program() {
    let frontend = Frontend::new().unwrap();
    let tree = frontend.parse("").unwrap();
    assert_eq!(tree.sign, Sign::NonTerminal(NonTerminal::Program));
    assert_eq!(tree.size(), 2);
}

#[test]
fn test_tree_dump_shows_lexemes() {
    let frontend = Frontend::new().unwrap();
    let tree = frontend.parse("int x;").unwrap();
    let dump = tree.to_string();
    assert!(dump.starts_with("program\n"));
    assert!(dump.contains("identifier 'x' (line 1)"));
}

#[test]
fn test_table_dump() {
    let frontend = Frontend::new().unwrap();
    let dump = frontend.table().display(frontend.grammar()).to_string();
    assert!(dump.contains("[program, #] program -> define-list"));
    assert!(dump.contains("[selection-follow, '}'] selection-follow -> ε"));
    assert_eq!(dump.lines().count(), frontend.table().len());
}
