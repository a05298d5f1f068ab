//! 논리 플랜: 실행 단계들의 트리
//!
//! 각 [`Node`]는 자식 노드를 독점 소유하고, 단계별 표현식 슬롯을 순서대로
//! 가집니다. `Display` 구현은 플랜 덤프 형식(`$aggregate: {$match: {...}}`)을
//! 생성합니다.

use std::fmt;

use crate::expressions::ExprPtr;

/// `database.collection` pair a stage reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CollectionName {
    pub database: String,
    pub collection: String,
}

impl CollectionName {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.database.is_empty() {
            f.write_str(&self.collection)
        } else {
            write!(f, "{}.{}", self.database, self.collection)
        }
    }
}

/// JOIN 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
            JoinType::Full => "full",
            JoinType::Cross => "cross",
        }
    }
}

/// 플랜 노드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Pipeline of stages over one collection
    Aggregate,
    /// Filter stage; the single expression slot is the predicate
    Match,
    /// Join stage; every expression slot is a join predicate
    Join(JoinType),
    /// ORDER BY
    Sort,
    /// LIMIT
    Limit(usize),
    /// Inline rows
    Data(usize),
}

/// 플랜 노드
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    node_type: NodeType,
    collection: CollectionName,
    children: Vec<Node>,
    expressions: Vec<ExprPtr>,
}

impl Node {
    pub fn new(node_type: NodeType, collection: CollectionName) -> Self {
        Self {
            node_type,
            collection,
            children: Vec::new(),
            expressions: Vec::new(),
        }
    }

    pub fn aggregate(collection: CollectionName) -> Self {
        Self::new(NodeType::Aggregate, collection)
    }

    /// Filter stage over `predicate`.
    pub fn matching(collection: CollectionName, predicate: ExprPtr) -> Self {
        Self::new(NodeType::Match, collection).with_expression(predicate)
    }

    pub fn join(collection: CollectionName, join_type: JoinType) -> Self {
        Self::new(NodeType::Join(join_type), collection)
    }

    pub fn sort(collection: CollectionName, keys: Vec<ExprPtr>) -> Self {
        let mut node = Self::new(NodeType::Sort, collection);
        node.expressions = keys;
        node
    }

    pub fn limit(collection: CollectionName, count: usize) -> Self {
        Self::new(NodeType::Limit(count), collection)
    }

    pub fn data(rows: usize) -> Self {
        Self::new(NodeType::Data(rows), CollectionName::default())
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_expression(mut self, expr: ExprPtr) -> Self {
        self.expressions.push(expr);
        self
    }

    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn append_expression(&mut self, expr: ExprPtr) {
        self.expressions.push(expr);
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn expressions(&self) -> &[ExprPtr] {
        &self.expressions
    }

    pub fn expressions_mut(&mut self) -> &mut Vec<ExprPtr> {
        &mut self.expressions
    }

    pub fn is_match(&self) -> bool {
        self.node_type == NodeType::Match
    }

    pub fn is_join(&self) -> bool {
        matches!(self.node_type, NodeType::Join(_))
    }

    /// Predicate of a filter stage, if this is one and it has a predicate.
    pub fn predicate(&self) -> Option<&ExprPtr> {
        if self.is_match() {
            self.expressions.first()
        } else {
            None
        }
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    leading_separator: bool,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 || leading_separator {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node_type {
            NodeType::Aggregate => {
                f.write_str("$aggregate: {")?;
                write_list(f, &self.children, false)?;
                f.write_str("}")
            }
            NodeType::Match => {
                f.write_str("$match: {")?;
                if let Some(predicate) = self.expressions.first() {
                    write!(f, "{predicate}")?;
                }
                f.write_str("}")
            }
            NodeType::Join(join_type) => {
                write!(f, "$join: {{$type: {}", join_type.as_str())?;
                write_list(f, &self.children, true)?;
                write_list(f, &self.expressions, true)?;
                f.write_str("}")
            }
            NodeType::Sort => {
                f.write_str("$sort: {")?;
                write_list(f, &self.expressions, false)?;
                f.write_str("}")
            }
            NodeType::Limit(count) => write!(f, "$limit: {count}"),
            NodeType::Data(rows) => write!(f, "$raw_data: {{$rows: {rows}}}"),
        }
    }
}
