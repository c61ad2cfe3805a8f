//! Rust source emitter - renders a binding plan into a module body

use alloy_json_abi::StateMutability;

use crate::domain::binding::{ArgPlan, BindingPlan, MethodPlan, StructPlan};

/// Items generated modules import from the runtime
const RUNTIME_IMPORTS: &[&str] = &[
    "AbiType",
    "Address",
    "BindingError",
    "Bytes",
    "ContractFactory",
    "ContractHandle",
    "DynSolValue",
    "FixedBytes",
    "FunctionDescriptor",
    "I256",
    "JsonAbi",
    "Overrides",
    "SignerOrProvider",
    "StateMutability",
    "TransactionCall",
    "TransactionRequest",
    "U256",
    "ViewCall",
    "tuple_fields",
];

/// Indented line buffer
#[derive(Default)]
struct Source {
    out: String,
    indent: usize,
}

impl Source {
    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render one contract's bindings
pub fn render(plan: &BindingPlan, abi_json: &str, runtime_path: &str) -> String {
    let mut src = Source::default();

    src.line(format!(
        "// @generated by kukugen from the `{}` ABI. Do not edit.",
        plan.contract
    ));
    src.blank();
    src.line("use ::std::sync::Arc;");
    src.line(format!(
        "use {runtime_path}::{{{}}};",
        RUNTIME_IMPORTS.join(", ")
    ));
    src.blank();

    render_abi(&mut src, plan, abi_json, runtime_path);
    render_descriptors(&mut src, plan);
    for item in &plan.structs {
        render_struct(&mut src, item);
    }
    render_trait(&mut src, plan);
    render_handle(&mut src, plan);
    if plan.is_deployable() {
        render_deployable_factory(&mut src, plan);
    } else {
        render_factory(&mut src, plan);
    }

    let mut out = src.finish();
    // Single trailing newline
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn render_abi(src: &mut Source, plan: &BindingPlan, abi_json: &str, runtime_path: &str) {
    let hashes = "#".repeat(raw_string_hashes(abi_json));
    src.line(format!("/// `{}` ABI, as JSON", plan.contract));
    src.line(format!("pub const ABI: &str = r{hashes}\"{abi_json}\"{hashes};"));
    src.blank();
    src.line("/// Parse the embedded ABI");
    src.open("pub fn abi() -> Result<JsonAbi, BindingError> {");
    src.line(format!("{runtime_path}::parse_abi(ABI)"));
    src.close("}");
    src.blank();
}

fn render_descriptors(src: &mut Source, plan: &BindingPlan) {
    for method in &plan.methods {
        let entry = &method.entry;
        src.line(format!("/// `{}` ({})", entry.signature, entry.mutability_str()));
        src.open(format!(
            "pub static {}: FunctionDescriptor = FunctionDescriptor {{",
            method.descriptor
        ));
        src.line(format!("name: {:?},", entry.name));
        src.line(format!("signature: {:?},", entry.signature));
        src.line(format!(
            "selector: [{}],",
            entry
                .selector
                .iter()
                .map(|b| format!("0x{b:02x}"))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        src.line(format!(
            "inputs: {},",
            str_slice(entry.inputs.iter().map(|p| p.kind.as_str()))
        ));
        src.line(format!(
            "outputs: {},",
            str_slice(entry.outputs.iter().map(|p| p.kind.as_str()))
        ));
        src.line(format!(
            "mutability: StateMutability::{},",
            mutability_variant(entry.mutability)
        ));
        src.close("};");
        src.blank();
    }

    src.line(format!("/// Every function of `{}`", plan.contract));
    let refs: Vec<String> = plan
        .methods
        .iter()
        .map(|method| format!("&{}", method.descriptor))
        .collect();
    src.line(format!(
        "pub static FUNCTIONS: &[&FunctionDescriptor] = &[{}];",
        refs.join(", ")
    ));
    src.blank();
}

fn render_struct(src: &mut Source, item: &StructPlan) {
    src.line(format!("/// `{}` as `{}`", item.sol_name, item.sol_type));
    src.line("#[derive(Debug, Clone, PartialEq, Eq, Default)]");
    if item.fields.is_empty() {
        src.line(format!("pub struct {} {{}}", item.name));
    } else {
        src.open(format!("pub struct {} {{", item.name));
        for field in &item.fields {
            src.line(format!("pub {}: {},", field.name, field.ty));
        }
        src.close("}");
    }
    src.blank();

    let names: Vec<&str> = item.fields.iter().map(|f| f.name.as_str()).collect();
    src.open(format!("impl AbiType for {} {{", item.name));

    src.open("fn into_value(self) -> DynSolValue {");
    if names.is_empty() {
        src.line("DynSolValue::Tuple(Vec::new())");
    } else {
        src.open("DynSolValue::Tuple(vec![");
        for name in &names {
            src.line(format!("self.{name}.into_value(),"));
        }
        src.close("])");
    }
    src.close("}");
    src.blank();

    src.open("fn from_value(value: DynSolValue) -> Result<Self, BindingError> {");
    src.line(format!(
        "let [{}] = tuple_fields::<{}>(value)?;",
        names.join(", "),
        names.len()
    ));
    if names.is_empty() {
        src.line("Ok(Self {})");
    } else {
        src.open("Ok(Self {");
        for name in &names {
            src.line(format!("{name}: AbiType::from_value({name})?,"));
        }
        src.close("})");
    }
    src.close("}");

    src.close("}");
    src.blank();
}

fn method_signature(method: &MethodPlan) -> String {
    let mut params = vec!["&self".to_string()];
    params.extend(
        method
            .args
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.ty)),
    );
    let call = if method.is_view() {
        "ViewCall"
    } else {
        "TransactionCall"
    };
    format!(
        "fn {}({}) -> {call}<{}>",
        method.name,
        params.join(", "),
        method.output
    )
}

fn render_trait(src: &mut Source, plan: &BindingPlan) {
    src.line(format!("/// Calls exposed by `{}`", plan.contract));
    src.open(format!("pub trait {} {{", plan.trait_name));
    for (idx, method) in plan.methods.iter().enumerate() {
        if idx > 0 {
            src.blank();
        }
        src.line(format!(
            "/// `{}` ({})",
            method.entry.signature,
            method.entry.mutability_str()
        ));
        src.line(format!("{};", method_signature(method)));
    }
    src.close("}");
    src.blank();
}

fn render_handle(src: &mut Source, plan: &BindingPlan) {
    let handle = &plan.handle_type;

    src.line(format!("/// Typed handle to a deployed `{}`", plan.contract));
    src.line("#[derive(Clone, Debug)]");
    src.open(format!("pub struct {handle} {{"));
    src.line("handle: ContractHandle,");
    src.close("}");
    src.blank();

    src.open(format!("impl {handle} {{"));
    src.open("pub fn new(address: Address, client: Arc<dyn SignerOrProvider>) -> Self {");
    src.line("Self::from_handle(ContractHandle::new(address, Some(client)))");
    src.close("}");
    src.blank();
    src.open("pub fn from_handle(handle: ContractHandle) -> Self {");
    src.line("Self { handle }");
    src.close("}");
    src.blank();
    src.open("pub fn address(&self) -> Address {");
    src.line("self.handle.address()");
    src.close("}");
    src.blank();
    src.open("pub fn handle(&self) -> &ContractHandle {");
    src.line("&self.handle");
    src.close("}");
    src.blank();
    src.line("/// Same contract, different signer-or-provider");
    src.open("pub fn with_client(&self, client: Arc<dyn SignerOrProvider>) -> Self {");
    src.line("Self::from_handle(self.handle.with_client(client))");
    src.close("}");
    src.close("}");
    src.blank();

    src.open(format!("impl {} for {handle} {{", plan.trait_name));
    for (idx, method) in plan.methods.iter().enumerate() {
        if idx > 0 {
            src.blank();
        }
        let builder = if method.is_view() { "view" } else { "transact" };
        src.open(format!("{} {{", method_signature(method)));
        src.line(format!(
            "self.handle.{builder}(&{}, {})",
            method.descriptor,
            values(&method.args)
        ));
        src.close("}");
    }
    src.close("}");
    src.blank();
}

fn render_factory(src: &mut Source, plan: &BindingPlan) {
    let handle = &plan.handle_type;

    src.line(format!("/// Connects to `{}` instances", plan.contract));
    src.line("#[derive(Clone, Copy, Debug, Default)]");
    src.line(format!("pub struct {};", plan.factory_type));
    src.blank();

    src.open(format!("impl {} {{", plan.factory_type));
    render_connect(src, handle);
    src.close("}");
    src.blank();
}

fn render_deployable_factory(src: &mut Source, plan: &BindingPlan) {
    let handle = &plan.handle_type;
    let factory = &plan.factory_type;
    let bytecode = plan.bytecode.as_deref().unwrap_or("0x");

    src.line(format!("/// `{}` deployment bytecode", plan.contract));
    src.line(format!("pub const BYTECODE: &str = {bytecode:?};"));
    src.blank();
    src.line("/// Constructor parameter types");
    src.line(format!(
        "pub const CONSTRUCTOR_INPUTS: &[&str] = {};",
        str_slice(plan.constructor.iter().map(|arg| arg.sol_type.as_str()))
    ));
    src.blank();

    src.line(format!("/// Deploys `{}` and connects to its instances", plan.contract));
    src.line("#[derive(Clone, Debug)]");
    src.open(format!("pub struct {factory} {{"));
    src.line("inner: ContractFactory,");
    src.close("}");
    src.blank();

    src.open(format!("impl Default for {factory} {{"));
    src.open("fn default() -> Self {");
    src.line("Self::new(None)");
    src.close("}");
    src.close("}");
    src.blank();

    let mut ctor_params: Vec<String> = plan
        .constructor
        .iter()
        .map(|arg| format!("{}: {}", arg.name, arg.ty))
        .collect();
    ctor_params.push("overrides: Overrides".to_string());
    let ctor_params = ctor_params.join(", ");
    let ctor_values = values(&plan.constructor);

    src.open(format!("impl {factory} {{"));
    src.open("pub fn new(signer: Option<Arc<dyn SignerOrProvider>>) -> Self {");
    src.line("Self::from_factory(ContractFactory::new(ABI, BYTECODE, CONSTRUCTOR_INPUTS, signer))");
    src.close("}");
    src.blank();
    src.open("pub fn from_factory(inner: ContractFactory) -> Self {");
    src.line("Self { inner }");
    src.close("}");
    src.blank();
    src.open("pub fn factory(&self) -> &ContractFactory {");
    src.line("&self.inner");
    src.close("}");
    src.blank();
    src.line("/// The contract-creation request `deploy` sends");
    src.open(format!(
        "pub fn deploy_transaction(&self, {ctor_params}) -> Result<TransactionRequest, BindingError> {{"
    ));
    src.line(format!(
        "self.inner.deploy_transaction({ctor_values}, overrides)"
    ));
    src.close("}");
    src.blank();
    src.line("/// Deploy a new instance and wait for it to be mined");
    src.open(format!(
        "pub async fn deploy(&self, {ctor_params}) -> Result<{handle}, BindingError> {{"
    ));
    src.line(format!(
        "self.inner.deploy({ctor_values}, overrides).await.map({handle}::from_handle)"
    ));
    src.close("}");
    src.blank();
    src.line("/// Handle to an existing instance, using this factory's signer");
    src.open(format!("pub fn attach(&self, address: Address) -> {handle} {{"));
    src.line(format!("{handle}::from_handle(self.inner.attach(address))"));
    src.close("}");
    src.blank();
    src.line("/// Same factory, bound to another signer");
    src.open("pub fn connect_signer(&self, signer: Arc<dyn SignerOrProvider>) -> Self {");
    src.line("Self::from_factory(self.inner.connect_signer(signer))");
    src.close("}");
    src.blank();
    render_connect(src, handle);
    src.close("}");
    src.blank();
}

fn render_connect(src: &mut Source, handle: &str) {
    src.line(format!("/// Bind `{handle}` at `address`; performs no I/O"));
    src.open(format!(
        "pub fn connect(address: Address, signer_or_provider: Arc<dyn SignerOrProvider>) -> {handle} {{"
    ));
    src.line(format!("{handle}::new(address, signer_or_provider)"));
    src.close("}");
}

/// `vec![a.into_value(), ..]` for a list of arguments
fn values(args: &[ArgPlan]) -> String {
    if args.is_empty() {
        return "vec![]".to_string();
    }
    let items: Vec<String> = args
        .iter()
        .map(|arg| format!("{}.into_value()", arg.name))
        .collect();
    format!("vec![{}]", items.join(", "))
}

fn str_slice<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<String> = items.map(|item| format!("{item:?}")).collect();
    format!("&[{}]", items.join(", "))
}

fn mutability_variant(mutability: StateMutability) -> &'static str {
    match mutability {
        StateMutability::Pure => "Pure",
        StateMutability::View => "View",
        StateMutability::NonPayable => "NonPayable",
        StateMutability::Payable => "Payable",
    }
}

/// Number of `#` a raw string needs to hold `text`
fn raw_string_hashes(text: &str) -> usize {
    let mut longest = 0;
    for (idx, _) in text.match_indices('"') {
        let run = text[idx + 1..].chars().take_while(|c| *c == '#').count();
        longest = longest.max(run);
    }
    longest + 1
}
