//! Function-body flow graphs.
//!
//! A body is lowered into straight-line blocks connected by predecessor
//! edges. Branch structure lives in the graph: an `if` forks a then-block
//! and an else-block off the forking block and rejoins them; a `while`
//! forks a body block off a header block and feeds the body's end back into
//! the header. Condition chains become `Cond` statements inside the forking
//! block so every contained chain has a program point.
//!
//! Blocks are walked in allocation order. Every predecessor of a block has
//! a smaller id than the block itself, except a loop header's back edge -
//! the walk is a single forward pass and never revisits a block.

use smallvec::SmallVec;
use vetch_common::PositionKey;
use vetch_common::ast::{AccessChain, Statement};
use vetch_common::TypeSnapshot;

/// Identifier of one straight-line block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The body's entry block.
    pub const ENTRY: BlockId = BlockId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Flow view of one body statement. Borrowed from the definition's body.
#[derive(Clone, Copy, Debug)]
pub enum FlowStmt<'a> {
    Assign {
        target: &'a str,
        value: &'a AccessChain,
    },
    Expr(&'a AccessChain),
    Return(Option<&'a AccessChain>),
    /// Branch or loop condition, evaluated in the forking block.
    Cond(&'a AccessChain),
}

impl<'a> FlowStmt<'a> {
    /// The chain this statement evaluates, if any.
    pub fn chain(&self) -> Option<&'a AccessChain> {
        match self {
            FlowStmt::Assign { value, .. } => Some(value),
            FlowStmt::Expr(chain) | FlowStmt::Cond(chain) => Some(chain),
            FlowStmt::Return(chain) => *chain,
        }
    }
}

/// One straight-line block.
#[derive(Debug)]
pub struct Block<'a> {
    pub statements: Vec<FlowStmt<'a>>,
    pub predecessors: SmallVec<[BlockId; 2]>,
}

/// A lowered body: blocks in allocation order.
#[derive(Debug)]
pub struct FlowGraph<'a> {
    blocks: Vec<Block<'a>>,
}

impl<'a> FlowGraph<'a> {
    pub fn build(body: &'a [Statement]) -> FlowGraph<'a> {
        let mut builder = FlowGraphBuilder {
            blocks: vec![Block {
                statements: Vec::new(),
                predecessors: SmallVec::new(),
            }],
            current: BlockId::ENTRY,
        };
        builder.lower_all(body);
        FlowGraph {
            blocks: builder.blocks,
        }
    }

    pub fn block(&self, id: BlockId) -> &Block<'a> {
        &self.blocks[id.index()]
    }

    /// Blocks in allocation order - the walk order of the checking pass.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block<'a>)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockId(index as u32), block))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The program-point key of a statement within this graph.
    pub fn position_key(block: BlockId, statement: usize) -> PositionKey {
        PositionKey::from_parts(block.0, statement as u32)
    }
}

/// Join the exit snapshots of a block's already-walked predecessors.
///
/// A binding survives only if every walked predecessor binds the same type;
/// disagreement widens to unbound. Predecessors with no exit yet (loop back
/// edges) are ignored - the walk is one forward pass, not a fixpoint.
pub fn join_snapshots(
    predecessors: &[BlockId],
    exits: &[Option<TypeSnapshot>],
) -> TypeSnapshot {
    let mut walked = predecessors
        .iter()
        .filter_map(|pred| exits[pred.index()].as_ref());
    let Some(first) = walked.next() else {
        return TypeSnapshot::new();
    };
    let mut joined = first.clone();
    for exit in walked {
        joined.retain_agreeing(exit);
    }
    joined
}

struct FlowGraphBuilder<'a> {
    blocks: Vec<Block<'a>>,
    current: BlockId,
}

impl<'a> FlowGraphBuilder<'a> {
    fn new_block(&mut self, predecessors: SmallVec<[BlockId; 2]>) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block {
            statements: Vec::new(),
            predecessors,
        });
        id
    }

    fn push(&mut self, statement: FlowStmt<'a>) {
        self.blocks[self.current.index()].statements.push(statement);
    }

    fn lower_all(&mut self, statements: &'a [Statement]) {
        for statement in statements {
            self.lower(statement);
        }
    }

    fn lower(&mut self, statement: &'a Statement) {
        match statement {
            Statement::Assign { target, value } => self.push(FlowStmt::Assign {
                target: target.as_str(),
                value,
            }),
            Statement::Expr(chain) => self.push(FlowStmt::Expr(chain)),
            Statement::Return(chain) => self.push(FlowStmt::Return(chain.as_ref())),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.push(FlowStmt::Cond(condition));
                let fork = self.current;

                let then_entry = self.new_block(SmallVec::from_slice(&[fork]));
                self.current = then_entry;
                self.lower_all(then_branch);
                let then_exit = self.current;

                let else_entry = self.new_block(SmallVec::from_slice(&[fork]));
                self.current = else_entry;
                self.lower_all(else_branch);
                let else_exit = self.current;

                self.current = self.new_block(SmallVec::from_slice(&[then_exit, else_exit]));
            }
            Statement::While { condition, body } => {
                let before = self.current;
                let header = self.new_block(SmallVec::from_slice(&[before]));
                self.current = header;
                self.push(FlowStmt::Cond(condition));

                let body_entry = self.new_block(SmallVec::from_slice(&[header]));
                self.current = body_entry;
                self.lower_all(body);
                let body_exit = self.current;
                // Back edge; ignored by the forward walk.
                self.blocks[header.index()].predecessors.push(body_exit);

                self.current = self.new_block(SmallVec::from_slice(&[header]));
            }
        }
    }
}
