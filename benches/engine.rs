use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pizza_cart::catalog::{self, PizzaBuild};
use pizza_cart::model::SizeCode;
use pizza_cart::{CartEngine, LineRef, MemoryStore, Operation, PricingConfig};

/// Generates cart sessions for benchmarking.
///
/// Pattern per session (repeating):
/// 1. Add a customized pizza
/// 2. Add a beverage
/// 3. Set the beverage quantity to 3
/// 4. Apply a promo (alternating valid / invalid)
/// 5. Remove line #1 twice
///
/// The cart never holds more than two lines.
#[derive(Clone)]
pub struct OpGenerator {
    sessions: u32,
    current_session: u32,
    current_step: u32,
    pizza: PizzaBuild,
}

impl OpGenerator {
    const STEPS: u32 = 6;

    pub fn new(sessions: u32) -> Self {
        let pizza = catalog::pizza("margherita")
            .map(|p| p.build().size(SizeCode::Large).toggle_topping("corn"))
            .expect("margherita is in the catalog");
        Self {
            sessions,
            current_session: 0,
            current_step: 0,
            pizza,
        }
    }

    /// Total number of operations this generator will produce
    pub fn total_operations(&self) -> u64 {
        self.sessions as u64 * Self::STEPS as u64
    }
}

impl Iterator for OpGenerator {
    type Item = Operation;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_session >= self.sessions {
            return None;
        }

        let op = match self.current_step {
            0 => Operation::AddLine(self.pizza.to_line()),
            1 => Operation::AddLine(
                catalog::menu_item("coke")
                    .expect("coke is in the catalog")
                    .to_line(1),
            ),
            2 => Operation::SetQuantity(LineRef::Position(2), 3),
            3 if self.current_session % 2 == 0 => Operation::ApplyPromo("first50".to_string()),
            3 => Operation::ApplyPromo("bogus".to_string()),
            _ => Operation::RemoveLine(LineRef::Position(1)),
        };

        self.current_step += 1;

        // Move to next session after all steps
        if self.current_step >= Self::STEPS {
            self.current_step = 0;
            self.current_session += 1;
        }

        Some(op)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.total_operations() as usize;
        let done = (self.current_session as u64 * Self::STEPS as u64 + self.current_step as u64)
            as usize;
        let remaining = total.saturating_sub(done);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OpGenerator {}

fn engine() -> CartEngine<MemoryStore> {
    let mut now = 0;
    CartEngine::new(MemoryStore::new(), PricingConfig::default()).with_clock(move || {
        now += 1;
        now
    })
}

fn bench_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("sessions");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut engine = engine();
                for op in OpGenerator::new(count) {
                    let _ = black_box(engine.apply(op));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_growing_cart(c: &mut Criterion) {
    let mut group = c.benchmark_group("growing_cart");

    // every add reprices and rewrites the whole cart
    for lines in [10u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            let pizza = catalog::pizza("pepperoni")
                .expect("pepperoni is in the catalog")
                .build();
            b.iter(|| {
                let mut engine = engine();
                for _ in 0..lines {
                    let _ = black_box(engine.add_line(pizza.to_line()));
                }
                let _ = black_box(engine.clear());
                engine
            });
        });
    }

    group.finish();
}

fn bench_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore");
    group.sample_size(20);

    let mut seeded = engine();
    for op in OpGenerator::new(1).take(3).cycle().take(300) {
        let _ = seeded.apply(op);
    }
    let store = seeded.into_store();

    group.bench_function("200_lines", |b| {
        b.iter(|| CartEngine::new(black_box(store.clone()), PricingConfig::default()));
    });

    group.finish();
}

criterion_group!(benches, bench_sessions, bench_growing_cart, bench_restore);
criterion_main!(benches);
