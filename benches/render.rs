use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use polyalg_core::id::OperatorId;
use polyalg_core::rex::{Operator, RexNode};
use polyalg_core::schema::{AlgDataType, PolyType};
use polyalg_core::RenderConfig;
use polyalg_digest::uniquify;
use polyalg_registry::{AlgNode, ArgumentValue, EntityRef, NodeRef, PolyAlgArgs, RegistryBuilder};
use polyalg_serialize::{render_to_text, serialize_plan, NoCosts};

#[derive(Debug)]
struct BenchNode {
    id: OperatorId,
    inputs: Vec<NodeRef>,
    fields: Vec<String>,
    args: PolyAlgArgs,
}

impl AlgNode for BenchNode {
    fn operator_id(&self) -> OperatorId {
        self.id.clone()
    }

    fn inputs(&self) -> &[NodeRef] {
        &self.inputs
    }

    fn output_field_names(&self) -> Vec<String> {
        self.fields.clone()
    }

    fn bind_arguments(&self) -> PolyAlgArgs {
        self.args.clone()
    }
}

fn scan(i: usize) -> NodeRef {
    Arc::new(BenchNode {
        id: OperatorId::new("LogicalRelScan"),
        inputs: vec![],
        fields: vec!["id".into(), "name".into(), "value".into()],
        args: PolyAlgArgs::new().with(
            "entity",
            ArgumentValue::Entity(EntityRef::new("public", format!("t{}", i))),
        ),
    })
}

/// Left-deep join of `n` scans that all expose the same field names.
fn join_chain(n: usize) -> NodeRef {
    let int = AlgDataType::new(PolyType::Integer);
    let mut plan = scan(0);
    for i in 1..n {
        let right = scan(i);
        let left_width = plan.output_field_names().len();
        let mut fields = plan.output_field_names();
        fields.extend(right.output_field_names());
        let cond = RexNode::call(
            Operator::equals(),
            vec![
                RexNode::index_ref(0, int.clone()),
                RexNode::index_ref(left_width, int.clone()),
            ],
            AlgDataType::new(PolyType::Boolean),
        );
        plan = Arc::new(BenchNode {
            id: OperatorId::new("LogicalRelJoin"),
            inputs: vec![plan, right],
            fields: uniquify(&fields),
            args: PolyAlgArgs::new().with("condition", ArgumentValue::rex(cond)),
        });
    }
    plan
}

fn bench_render(c: &mut Criterion) {
    let registry = RegistryBuilder::with_builtins().build();
    let cfg = RenderConfig::default();
    let plan = join_chain(16);
    c.bench_function("render_text_join16", |b| {
        b.iter(|| {
            let _ = render_to_text(plan.as_ref(), &registry, &cfg).unwrap();
        })
    });
    c.bench_function("serialize_json_join16", |b| {
        b.iter(|| {
            let _ = serialize_plan(plan.as_ref(), &registry, &NoCosts, &cfg).unwrap();
        })
    });
}

fn bench_export(c: &mut Criterion) {
    c.bench_function("registry_export_cold", |b| {
        b.iter(|| {
            let registry = RegistryBuilder::with_builtins().build();
            let _ = registry.export_fingerprint().unwrap();
        })
    });
}

criterion_group!(render, bench_render, bench_export);
criterion_main!(render);
