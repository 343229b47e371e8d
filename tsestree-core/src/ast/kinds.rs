//! Standardized node kinds
//!
//! Every node kind is declared once in the `node_kinds!` table below. The
//! table drives the payload enum, the plain `NodeType` tag, child traversal
//! and the visitor keys, so the three can never disagree.

use super::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A child field of a node: a single child, an optional child, a list, or a
/// list with holes (array elisions).
pub trait ChildSlot {
    fn each(&self, key: &'static str, f: &mut dyn FnMut(&'static str, NodeId));
    fn to_json(&self, f: &mut dyn FnMut(NodeId) -> Value) -> Value;
}

impl ChildSlot for NodeId {
    fn each(&self, key: &'static str, f: &mut dyn FnMut(&'static str, NodeId)) {
        f(key, *self);
    }

    fn to_json(&self, f: &mut dyn FnMut(NodeId) -> Value) -> Value {
        f(*self)
    }
}

impl ChildSlot for Option<NodeId> {
    fn each(&self, key: &'static str, f: &mut dyn FnMut(&'static str, NodeId)) {
        if let Some(id) = self {
            f(key, *id);
        }
    }

    fn to_json(&self, f: &mut dyn FnMut(NodeId) -> Value) -> Value {
        self.map_or(Value::Null, |id| f(id))
    }
}

impl ChildSlot for Vec<NodeId> {
    fn each(&self, key: &'static str, f: &mut dyn FnMut(&'static str, NodeId)) {
        for id in self {
            f(key, *id);
        }
    }

    fn to_json(&self, f: &mut dyn FnMut(NodeId) -> Value) -> Value {
        Value::Array(self.iter().map(|id| f(*id)).collect())
    }
}

impl ChildSlot for Vec<Option<NodeId>> {
    fn each(&self, key: &'static str, f: &mut dyn FnMut(&'static str, NodeId)) {
        for id in self.iter().flatten() {
            f(key, *id);
        }
    }

    fn to_json(&self, f: &mut dyn FnMut(NodeId) -> Value) -> Value {
        Value::Array(
            self.iter()
                .map(|slot| slot.map_or(Value::Null, |id| f(id)))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Script,
    Module,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariableKind {
    #[serde(rename = "var")]
    Var,
    #[serde(rename = "let")]
    Let,
    #[serde(rename = "const")]
    Const,
    #[serde(rename = "using")]
    Using,
    #[serde(rename = "await using")]
    AwaitUsing,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
            VariableKind::Using => "using",
            VariableKind::AwaitUsing => "await using",
        }
    }

    /// `var` is the only function-scoped declaration kind
    pub fn is_block_scoped(self) -> bool {
        !matches!(self, VariableKind::Var)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Public,
    Protected,
    Private,
}

/// `value` vs `type` flavour of import/export declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportExportKind {
    Value,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Global,
    Module,
    Namespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MappedModifier {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegExpValue {
    pub pattern: String,
    pub flags: String,
}

/// Value carried by a `Literal` node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    RegExp { regex: RegExpValue },
    BigInt { bigint: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateValue {
    pub raw: String,
    /// `None` when the raw text holds an invalid escape (allowed in tagged templates)
    pub cooked: Option<String>,
}

macro_rules! node_kinds {
    ($(
        $(#[$vmeta:meta])*
        $kind:ident {
            $( $(#[$fmeta:meta])* $field:ident : $fty:ty ),* $(,)?
        } => [ $( $key:literal : $child:ident ),* $(,)? ];
    )*) => {
        /// Payload of a standardized node
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "type", rename_all_fields = "camelCase")]
        pub enum NodeKind {
            $(
                $(#[$vmeta])*
                $kind { $( $(#[$fmeta])* $field: $fty ),* },
            )*
        }

        /// Tag of a standardized node, without payload
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum NodeType {
            $( $kind, )*
        }

        impl NodeType {
            /// Every node type, in declaration order
            pub const ALL: &'static [NodeType] = &[ $( NodeType::$kind, )* ];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( NodeType::$kind => stringify!($kind), )*
                }
            }

            /// Child fields a generic walker must visit, in visiting order
            pub fn visitor_keys(self) -> &'static [&'static str] {
                match self {
                    $( NodeType::$kind => &[ $( $key, )* ], )*
                }
            }

            pub fn from_name(name: &str) -> Option<NodeType> {
                match name {
                    $( stringify!($kind) => Some(NodeType::$kind), )*
                    _ => None,
                }
            }
        }

        impl NodeKind {
            pub fn node_type(&self) -> NodeType {
                match self {
                    $( NodeKind::$kind { .. } => NodeType::$kind, )*
                }
            }

            /// Call `f` for every child, in visitor-key order
            pub fn for_each_child(&self, f: &mut dyn FnMut(&'static str, NodeId)) {
                match self {
                    $(
                        #[allow(unused_variables)]
                        NodeKind::$kind { $( $child, )* .. } => {
                            $( ChildSlot::each($child, $key, &mut *f); )*
                        }
                    )*
                }
            }

            /// Child fields rendered through `f`, keyed by their visitor key
            pub(crate) fn child_values(
                &self,
                f: &mut dyn FnMut(NodeId) -> Value,
            ) -> Vec<(&'static str, Value)> {
                match self {
                    $(
                        #[allow(unused_variables)]
                        NodeKind::$kind { $( $child, )* .. } => {
                            vec![ $( ($key, ChildSlot::to_json($child, &mut *f)), )* ]
                        }
                    )*
                }
            }
        }
    };
}

node_kinds! {
    // Program and identifiers
    Program { body: Vec<NodeId>, source_type: SourceType } => ["body": body];
    Identifier {
        name: String,
        optional: bool,
        type_annotation: Option<NodeId>,
        decorators: Vec<NodeId>,
    } => ["decorators": decorators, "typeAnnotation": type_annotation];
    PrivateIdentifier { name: String } => [];
    Literal { value: LiteralValue, raw: String } => [];
    TemplateLiteral { quasis: Vec<NodeId>, expressions: Vec<NodeId> }
        => ["quasis": quasis, "expressions": expressions];
    TemplateElement { value: TemplateValue, tail: bool } => [];
    TaggedTemplateExpression { tag: NodeId, type_arguments: Option<NodeId>, quasi: NodeId }
        => ["tag": tag, "typeArguments": type_arguments, "quasi": quasi];

    // Expressions
    ThisExpression {} => [];
    Super {} => [];
    ArrayExpression { elements: Vec<Option<NodeId>> } => ["elements": elements];
    ObjectExpression { properties: Vec<NodeId> } => ["properties": properties];
    Property {
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        method: bool,
        shorthand: bool,
        computed: bool,
        optional: bool,
    } => ["key": key, "value": value];
    SpreadElement { argument: NodeId } => ["argument": argument];
    FunctionExpression {
        id: Option<NodeId>,
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
        body: NodeId,
        generator: bool,
        #[serde(rename = "async")]
        is_async: bool,
        expression: bool,
        declare: bool,
    } => ["id": id, "typeParameters": type_parameters, "params": params, "returnType": return_type, "body": body];
    ArrowFunctionExpression {
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
        body: NodeId,
        generator: bool,
        #[serde(rename = "async")]
        is_async: bool,
        expression: bool,
    } => ["typeParameters": type_parameters, "params": params, "returnType": return_type, "body": body];
    UnaryExpression { operator: &'static str, prefix: bool, argument: NodeId } => ["argument": argument];
    UpdateExpression { operator: &'static str, prefix: bool, argument: NodeId } => ["argument": argument];
    BinaryExpression { operator: &'static str, left: NodeId, right: NodeId } => ["left": left, "right": right];
    LogicalExpression { operator: &'static str, left: NodeId, right: NodeId } => ["left": left, "right": right];
    AssignmentExpression { operator: &'static str, left: NodeId, right: NodeId } => ["left": left, "right": right];
    MemberExpression { object: NodeId, property: NodeId, computed: bool, optional: bool }
        => ["object": object, "property": property];
    ConditionalExpression { test: NodeId, consequent: NodeId, alternate: NodeId }
        => ["test": test, "consequent": consequent, "alternate": alternate];
    CallExpression { callee: NodeId, type_arguments: Option<NodeId>, arguments: Vec<NodeId>, optional: bool }
        => ["callee": callee, "typeArguments": type_arguments, "arguments": arguments];
    NewExpression { callee: NodeId, type_arguments: Option<NodeId>, arguments: Vec<NodeId> }
        => ["callee": callee, "typeArguments": type_arguments, "arguments": arguments];
    SequenceExpression { expressions: Vec<NodeId> } => ["expressions": expressions];
    YieldExpression { argument: Option<NodeId>, delegate: bool } => ["argument": argument];
    AwaitExpression { argument: NodeId } => ["argument": argument];
    MetaProperty { meta: NodeId, property: NodeId } => ["meta": meta, "property": property];
    ImportExpression { source: NodeId, options: Option<NodeId> } => ["source": source, "options": options];
    ChainExpression { expression: NodeId } => ["expression": expression];

    // Classes
    ClassDeclaration {
        decorators: Vec<NodeId>,
        id: Option<NodeId>,
        type_parameters: Option<NodeId>,
        super_class: Option<NodeId>,
        super_type_arguments: Option<NodeId>,
        implements: Vec<NodeId>,
        body: NodeId,
        #[serde(rename = "abstract")]
        is_abstract: bool,
        declare: bool,
    } => ["decorators": decorators, "id": id, "typeParameters": type_parameters, "superClass": super_class,
          "superTypeArguments": super_type_arguments, "implements": implements, "body": body];
    ClassExpression {
        decorators: Vec<NodeId>,
        id: Option<NodeId>,
        type_parameters: Option<NodeId>,
        super_class: Option<NodeId>,
        super_type_arguments: Option<NodeId>,
        implements: Vec<NodeId>,
        body: NodeId,
        #[serde(rename = "abstract")]
        is_abstract: bool,
    } => ["decorators": decorators, "id": id, "typeParameters": type_parameters, "superClass": super_class,
          "superTypeArguments": super_type_arguments, "implements": implements, "body": body];
    ClassBody { body: Vec<NodeId> } => ["body": body];
    MethodDefinition {
        decorators: Vec<NodeId>,
        key: NodeId,
        value: NodeId,
        kind: MethodKind,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
        optional: bool,
        #[serde(rename = "override")]
        is_override: bool,
        accessibility: Option<Accessibility>,
    } => ["decorators": decorators, "key": key, "value": value];
    TSAbstractMethodDefinition {
        decorators: Vec<NodeId>,
        key: NodeId,
        value: NodeId,
        kind: MethodKind,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
        optional: bool,
        #[serde(rename = "override")]
        is_override: bool,
        accessibility: Option<Accessibility>,
    } => ["decorators": decorators, "key": key, "value": value];
    PropertyDefinition {
        decorators: Vec<NodeId>,
        key: NodeId,
        type_annotation: Option<NodeId>,
        value: Option<NodeId>,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
        declare: bool,
        readonly: bool,
        optional: bool,
        definite: bool,
        #[serde(rename = "override")]
        is_override: bool,
        accessibility: Option<Accessibility>,
    } => ["decorators": decorators, "key": key, "typeAnnotation": type_annotation, "value": value];
    TSAbstractPropertyDefinition {
        decorators: Vec<NodeId>,
        key: NodeId,
        type_annotation: Option<NodeId>,
        value: Option<NodeId>,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
        declare: bool,
        readonly: bool,
        optional: bool,
        definite: bool,
        #[serde(rename = "override")]
        is_override: bool,
        accessibility: Option<Accessibility>,
    } => ["decorators": decorators, "key": key, "typeAnnotation": type_annotation, "value": value];
    AccessorProperty {
        decorators: Vec<NodeId>,
        key: NodeId,
        type_annotation: Option<NodeId>,
        value: Option<NodeId>,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
        definite: bool,
        #[serde(rename = "override")]
        is_override: bool,
        accessibility: Option<Accessibility>,
    } => ["decorators": decorators, "key": key, "typeAnnotation": type_annotation, "value": value];
    TSAbstractAccessorProperty {
        decorators: Vec<NodeId>,
        key: NodeId,
        type_annotation: Option<NodeId>,
        value: Option<NodeId>,
        computed: bool,
        #[serde(rename = "static")]
        is_static: bool,
        definite: bool,
        #[serde(rename = "override")]
        is_override: bool,
        accessibility: Option<Accessibility>,
    } => ["decorators": decorators, "key": key, "typeAnnotation": type_annotation, "value": value];
    StaticBlock { body: Vec<NodeId> } => ["body": body];
    Decorator { expression: NodeId } => ["expression": expression];
    TSParameterProperty {
        decorators: Vec<NodeId>,
        parameter: NodeId,
        accessibility: Option<Accessibility>,
        readonly: bool,
        #[serde(rename = "override")]
        is_override: bool,
    } => ["decorators": decorators, "parameter": parameter];
    TSIndexSignature {
        parameters: Vec<NodeId>,
        type_annotation: Option<NodeId>,
        readonly: bool,
        #[serde(rename = "static")]
        is_static: bool,
    } => ["parameters": parameters, "typeAnnotation": type_annotation];
    TSEmptyBodyFunctionExpression {
        id: Option<NodeId>,
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
        generator: bool,
        #[serde(rename = "async")]
        is_async: bool,
        expression: bool,
        declare: bool,
    } => ["id": id, "typeParameters": type_parameters, "params": params, "returnType": return_type];
    TSDeclareFunction {
        id: Option<NodeId>,
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
        generator: bool,
        #[serde(rename = "async")]
        is_async: bool,
        expression: bool,
        declare: bool,
    } => ["id": id, "typeParameters": type_parameters, "params": params, "returnType": return_type];

    // Statements
    ExpressionStatement { expression: NodeId, directive: Option<String> } => ["expression": expression];
    BlockStatement { body: Vec<NodeId> } => ["body": body];
    EmptyStatement {} => [];
    DebuggerStatement {} => [];
    WithStatement { object: NodeId, body: NodeId } => ["object": object, "body": body];
    ReturnStatement { argument: Option<NodeId> } => ["argument": argument];
    LabeledStatement { label: NodeId, body: NodeId } => ["label": label, "body": body];
    BreakStatement { label: Option<NodeId> } => ["label": label];
    ContinueStatement { label: Option<NodeId> } => ["label": label];
    IfStatement { test: NodeId, consequent: NodeId, alternate: Option<NodeId> }
        => ["test": test, "consequent": consequent, "alternate": alternate];
    SwitchStatement { discriminant: NodeId, cases: Vec<NodeId> } => ["discriminant": discriminant, "cases": cases];
    SwitchCase { test: Option<NodeId>, consequent: Vec<NodeId> } => ["test": test, "consequent": consequent];
    ThrowStatement { argument: NodeId } => ["argument": argument];
    TryStatement { block: NodeId, handler: Option<NodeId>, finalizer: Option<NodeId> }
        => ["block": block, "handler": handler, "finalizer": finalizer];
    CatchClause { param: Option<NodeId>, body: NodeId } => ["param": param, "body": body];
    WhileStatement { test: NodeId, body: NodeId } => ["test": test, "body": body];
    DoWhileStatement { body: NodeId, test: NodeId } => ["body": body, "test": test];
    ForStatement { init: Option<NodeId>, test: Option<NodeId>, update: Option<NodeId>, body: NodeId }
        => ["init": init, "test": test, "update": update, "body": body];
    ForInStatement { left: NodeId, right: NodeId, body: NodeId } => ["left": left, "right": right, "body": body];
    ForOfStatement {
        left: NodeId,
        right: NodeId,
        body: NodeId,
        #[serde(rename = "await")]
        is_await: bool,
    } => ["left": left, "right": right, "body": body];
    FunctionDeclaration {
        id: Option<NodeId>,
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
        body: NodeId,
        generator: bool,
        #[serde(rename = "async")]
        is_async: bool,
        expression: bool,
        declare: bool,
    } => ["id": id, "typeParameters": type_parameters, "params": params, "returnType": return_type, "body": body];
    VariableDeclaration { declarations: Vec<NodeId>, kind: VariableKind, declare: bool }
        => ["declarations": declarations];
    VariableDeclarator { id: NodeId, init: Option<NodeId>, definite: bool } => ["id": id, "init": init];

    // Patterns
    ArrayPattern {
        decorators: Vec<NodeId>,
        elements: Vec<Option<NodeId>>,
        type_annotation: Option<NodeId>,
        optional: bool,
    } => ["decorators": decorators, "elements": elements, "typeAnnotation": type_annotation];
    ObjectPattern {
        decorators: Vec<NodeId>,
        properties: Vec<NodeId>,
        type_annotation: Option<NodeId>,
        optional: bool,
    } => ["decorators": decorators, "properties": properties, "typeAnnotation": type_annotation];
    RestElement {
        decorators: Vec<NodeId>,
        argument: NodeId,
        type_annotation: Option<NodeId>,
        optional: bool,
    } => ["decorators": decorators, "argument": argument, "typeAnnotation": type_annotation];
    AssignmentPattern { decorators: Vec<NodeId>, left: NodeId, right: NodeId }
        => ["decorators": decorators, "left": left, "right": right];

    // Modules
    ImportDeclaration {
        specifiers: Vec<NodeId>,
        source: NodeId,
        attributes: Vec<NodeId>,
        import_kind: ImportExportKind,
    } => ["specifiers": specifiers, "source": source, "attributes": attributes];
    ImportSpecifier { imported: NodeId, local: NodeId, import_kind: ImportExportKind }
        => ["imported": imported, "local": local];
    ImportDefaultSpecifier { local: NodeId } => ["local": local];
    ImportNamespaceSpecifier { local: NodeId } => ["local": local];
    ImportAttribute { key: NodeId, value: NodeId } => ["key": key, "value": value];
    ExportNamedDeclaration {
        declaration: Option<NodeId>,
        specifiers: Vec<NodeId>,
        source: Option<NodeId>,
        attributes: Vec<NodeId>,
        export_kind: ImportExportKind,
    } => ["declaration": declaration, "specifiers": specifiers, "source": source, "attributes": attributes];
    ExportSpecifier { local: NodeId, exported: NodeId, export_kind: ImportExportKind }
        => ["local": local, "exported": exported];
    ExportDefaultDeclaration { declaration: NodeId, export_kind: ImportExportKind } => ["declaration": declaration];
    ExportAllDeclaration {
        exported: Option<NodeId>,
        source: NodeId,
        attributes: Vec<NodeId>,
        export_kind: ImportExportKind,
    } => ["exported": exported, "source": source, "attributes": attributes];

    // JSX
    JSXElement { opening_element: NodeId, children: Vec<NodeId>, closing_element: Option<NodeId> }
        => ["openingElement": opening_element, "children": children, "closingElement": closing_element];
    JSXOpeningElement { name: NodeId, type_arguments: Option<NodeId>, attributes: Vec<NodeId>, self_closing: bool }
        => ["name": name, "typeArguments": type_arguments, "attributes": attributes];
    JSXClosingElement { name: NodeId } => ["name": name];
    JSXFragment { opening_fragment: NodeId, children: Vec<NodeId>, closing_fragment: NodeId }
        => ["openingFragment": opening_fragment, "children": children, "closingFragment": closing_fragment];
    JSXOpeningFragment {} => [];
    JSXClosingFragment {} => [];
    JSXAttribute { name: NodeId, value: Option<NodeId> } => ["name": name, "value": value];
    JSXSpreadAttribute { argument: NodeId } => ["argument": argument];
    JSXIdentifier { name: String } => [];
    JSXMemberExpression { object: NodeId, property: NodeId } => ["object": object, "property": property];
    JSXNamespacedName { namespace: NodeId, name: NodeId } => ["namespace": namespace, "name": name];
    JSXExpressionContainer { expression: NodeId } => ["expression": expression];
    JSXEmptyExpression {} => [];
    JSXSpreadChild { expression: NodeId } => ["expression": expression];
    JSXText { value: String, raw: String } => [];

    // TypeScript expressions and declarations
    TSTypeAnnotation { type_annotation: NodeId } => ["typeAnnotation": type_annotation];
    TSTypeParameterDeclaration { params: Vec<NodeId> } => ["params": params];
    TSTypeParameter {
        name: NodeId,
        constraint: Option<NodeId>,
        default: Option<NodeId>,
        #[serde(rename = "in")]
        is_in: bool,
        out: bool,
        #[serde(rename = "const")]
        is_const: bool,
    } => ["name": name, "constraint": constraint, "default": default];
    TSTypeParameterInstantiation { params: Vec<NodeId> } => ["params": params];
    TSAsExpression { expression: NodeId, type_annotation: NodeId }
        => ["expression": expression, "typeAnnotation": type_annotation];
    TSSatisfiesExpression { expression: NodeId, type_annotation: NodeId }
        => ["expression": expression, "typeAnnotation": type_annotation];
    TSTypeAssertion { type_annotation: NodeId, expression: NodeId }
        => ["typeAnnotation": type_annotation, "expression": expression];
    TSNonNullExpression { expression: NodeId } => ["expression": expression];
    TSInstantiationExpression { expression: NodeId, type_arguments: NodeId }
        => ["expression": expression, "typeArguments": type_arguments];
    TSTypeAliasDeclaration { id: NodeId, type_parameters: Option<NodeId>, type_annotation: NodeId, declare: bool }
        => ["id": id, "typeParameters": type_parameters, "typeAnnotation": type_annotation];
    TSInterfaceDeclaration {
        id: NodeId,
        type_parameters: Option<NodeId>,
        extends: Vec<NodeId>,
        body: NodeId,
        declare: bool,
    } => ["id": id, "typeParameters": type_parameters, "extends": extends, "body": body];
    TSInterfaceBody { body: Vec<NodeId> } => ["body": body];
    TSInterfaceHeritage { expression: NodeId, type_arguments: Option<NodeId> }
        => ["expression": expression, "typeArguments": type_arguments];
    TSClassImplements { expression: NodeId, type_arguments: Option<NodeId> }
        => ["expression": expression, "typeArguments": type_arguments];
    TSEnumDeclaration {
        id: NodeId,
        body: NodeId,
        #[serde(rename = "const")]
        is_const: bool,
        declare: bool,
    } => ["id": id, "body": body];
    TSEnumBody { members: Vec<NodeId> } => ["members": members];
    TSEnumMember { id: NodeId, initializer: Option<NodeId>, computed: bool } => ["id": id, "initializer": initializer];
    TSModuleDeclaration { id: NodeId, body: Option<NodeId>, kind: ModuleKind, declare: bool, global: bool }
        => ["id": id, "body": body];
    TSModuleBlock { body: Vec<NodeId> } => ["body": body];
    TSImportEqualsDeclaration { id: NodeId, module_reference: NodeId, import_kind: ImportExportKind }
        => ["id": id, "moduleReference": module_reference];
    TSExternalModuleReference { expression: NodeId } => ["expression": expression];
    TSExportAssignment { expression: NodeId } => ["expression": expression];
    TSNamespaceExportDeclaration { id: NodeId } => ["id": id];
    TSQualifiedName { left: NodeId, right: NodeId } => ["left": left, "right": right];

    // TypeScript types
    TSAnyKeyword {} => [];
    TSUnknownKeyword {} => [];
    TSNumberKeyword {} => [];
    TSObjectKeyword {} => [];
    TSBooleanKeyword {} => [];
    TSBigIntKeyword {} => [];
    TSStringKeyword {} => [];
    TSSymbolKeyword {} => [];
    TSVoidKeyword {} => [];
    TSUndefinedKeyword {} => [];
    TSNullKeyword {} => [];
    TSNeverKeyword {} => [];
    TSIntrinsicKeyword {} => [];
    TSThisType {} => [];
    TSFunctionType { type_parameters: Option<NodeId>, params: Vec<NodeId>, return_type: Option<NodeId> }
        => ["typeParameters": type_parameters, "params": params, "returnType": return_type];
    TSConstructorType {
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
        #[serde(rename = "abstract")]
        is_abstract: bool,
    } => ["typeParameters": type_parameters, "params": params, "returnType": return_type];
    TSTypeReference { type_name: NodeId, type_arguments: Option<NodeId> }
        => ["typeName": type_name, "typeArguments": type_arguments];
    TSTypeQuery { expr_name: NodeId, type_arguments: Option<NodeId> }
        => ["exprName": expr_name, "typeArguments": type_arguments];
    TSTypeLiteral { members: Vec<NodeId> } => ["members": members];
    TSArrayType { element_type: NodeId } => ["elementType": element_type];
    TSTupleType { element_types: Vec<NodeId> } => ["elementTypes": element_types];
    TSNamedTupleMember { label: NodeId, element_type: NodeId, optional: bool }
        => ["label": label, "elementType": element_type];
    TSOptionalType { type_annotation: NodeId } => ["typeAnnotation": type_annotation];
    TSRestType { type_annotation: NodeId } => ["typeAnnotation": type_annotation];
    TSUnionType { types: Vec<NodeId> } => ["types": types];
    TSIntersectionType { types: Vec<NodeId> } => ["types": types];
    TSConditionalType { check_type: NodeId, extends_type: NodeId, true_type: NodeId, false_type: NodeId }
        => ["checkType": check_type, "extendsType": extends_type, "trueType": true_type, "falseType": false_type];
    TSInferType { type_parameter: NodeId } => ["typeParameter": type_parameter];
    TSTypeOperator { operator: &'static str, type_annotation: NodeId } => ["typeAnnotation": type_annotation];
    TSIndexedAccessType { object_type: NodeId, index_type: NodeId }
        => ["objectType": object_type, "indexType": index_type];
    TSMappedType {
        key: NodeId,
        constraint: NodeId,
        name_type: Option<NodeId>,
        type_annotation: Option<NodeId>,
        optional: Option<MappedModifier>,
        readonly: Option<MappedModifier>,
    } => ["key": key, "constraint": constraint, "nameType": name_type, "typeAnnotation": type_annotation];
    TSLiteralType { literal: NodeId } => ["literal": literal];
    TSTemplateLiteralType { quasis: Vec<NodeId>, types: Vec<NodeId> } => ["quasis": quasis, "types": types];
    TSTypePredicate { parameter_name: NodeId, type_annotation: Option<NodeId>, asserts: bool }
        => ["parameterName": parameter_name, "typeAnnotation": type_annotation];
    TSImportType { argument: NodeId, qualifier: Option<NodeId>, type_arguments: Option<NodeId> }
        => ["argument": argument, "qualifier": qualifier, "typeArguments": type_arguments];
    TSPropertySignature {
        key: NodeId,
        type_annotation: Option<NodeId>,
        computed: bool,
        optional: bool,
        readonly: bool,
    } => ["key": key, "typeAnnotation": type_annotation];
    TSMethodSignature {
        key: NodeId,
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
        kind: MethodKind,
        computed: bool,
        optional: bool,
    } => ["key": key, "typeParameters": type_parameters, "params": params, "returnType": return_type];
    TSCallSignatureDeclaration { type_parameters: Option<NodeId>, params: Vec<NodeId>, return_type: Option<NodeId> }
        => ["typeParameters": type_parameters, "params": params, "returnType": return_type];
    TSConstructSignatureDeclaration {
        type_parameters: Option<NodeId>,
        params: Vec<NodeId>,
        return_type: Option<NodeId>,
    } => ["typeParameters": type_parameters, "params": params, "returnType": return_type];
}

impl NodeType {
    /// Whether nodes of this type only ever appear in type positions
    pub fn is_type_node(self) -> bool {
        use NodeType::*;
        matches!(
            self,
            TSTypeAnnotation
                | TSTypeParameterDeclaration
                | TSTypeParameter
                | TSTypeParameterInstantiation
                | TSInterfaceBody
                | TSInterfaceHeritage
                | TSClassImplements
                | TSAnyKeyword
                | TSUnknownKeyword
                | TSNumberKeyword
                | TSObjectKeyword
                | TSBooleanKeyword
                | TSBigIntKeyword
                | TSStringKeyword
                | TSSymbolKeyword
                | TSVoidKeyword
                | TSUndefinedKeyword
                | TSNullKeyword
                | TSNeverKeyword
                | TSIntrinsicKeyword
                | TSThisType
                | TSFunctionType
                | TSConstructorType
                | TSTypeReference
                | TSTypeQuery
                | TSTypeLiteral
                | TSArrayType
                | TSTupleType
                | TSNamedTupleMember
                | TSOptionalType
                | TSRestType
                | TSUnionType
                | TSIntersectionType
                | TSConditionalType
                | TSInferType
                | TSTypeOperator
                | TSIndexedAccessType
                | TSMappedType
                | TSLiteralType
                | TSTemplateLiteralType
                | TSTypePredicate
                | TSImportType
                | TSPropertySignature
                | TSMethodSignature
                | TSCallSignatureDeclaration
                | TSConstructSignatureDeclaration
        )
    }

    /// Function-like nodes that own a parameter list
    pub fn is_function(self) -> bool {
        matches!(
            self,
            NodeType::FunctionDeclaration
                | NodeType::FunctionExpression
                | NodeType::ArrowFunctionExpression
                | NodeType::TSDeclareFunction
                | NodeType::TSEmptyBodyFunctionExpression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_round_trips_through_name() {
        for node_type in NodeType::ALL {
            assert_eq!(NodeType::from_name(node_type.as_str()), Some(*node_type));
        }
        assert_eq!(NodeType::from_name("NotANode"), None);
    }

    #[test]
    fn test_for_each_child_follows_visitor_keys() {
        let kind = NodeKind::IfStatement {
            test: NodeId(0),
            consequent: NodeId(1),
            alternate: Some(NodeId(2)),
        };
        let mut seen = Vec::new();
        kind.for_each_child(&mut |key, id| seen.push((key, id)));
        assert_eq!(
            seen,
            vec![
                ("test", NodeId(0)),
                ("consequent", NodeId(1)),
                ("alternate", NodeId(2)),
            ]
        );
    }

    #[test]
    fn test_array_holes_are_skipped_by_walk_but_kept_in_json() {
        let kind = NodeKind::ArrayExpression {
            elements: vec![Some(NodeId(4)), None, Some(NodeId(5))],
        };
        let mut count = 0;
        kind.for_each_child(&mut |_, _| count += 1);
        assert_eq!(count, 2);

        let values = kind.child_values(&mut |id| Value::from(id.0));
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].1, serde_json::json!([4, null, 5]));
    }

    #[test]
    fn test_payload_serializes_with_type_tag() {
        let kind = NodeKind::Literal {
            value: LiteralValue::Number(1.5),
            raw: "1.5".to_string(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "Literal");
        assert_eq!(json["value"], 1.5);
        assert_eq!(json["raw"], "1.5");
    }

    #[test]
    fn test_type_nodes_are_classified() {
        assert!(NodeType::TSTypeReference.is_type_node());
        assert!(!NodeType::TSAsExpression.is_type_node());
        assert!(!NodeType::Identifier.is_type_node());
        assert!(NodeType::ArrowFunctionExpression.is_function());
    }
}
