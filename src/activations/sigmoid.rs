use std::sync::OnceLock;

use log::info;

const TABLE_SIZE: usize = 4096;
const DOMAIN_MIN: f64 = -15.0;
const DOMAIN_MAX: f64 = 15.0;

static TABLE: OnceLock<SigmoidTable> = OnceLock::new();

/// Exact logistic sigmoid. The clamps keep extreme weighted sums from
/// overflowing `exp`.
pub(crate) fn exact(z: f64) -> f64 {
    if z < -45.0 {
        return 0.0;
    }
    if z > 45.0 {
        return 1.0;
    }

    1.0 / (1.0 + (-z).exp())
}

/// Sigmoid approximated by the shared lookup table.
pub(crate) fn cached(z: f64) -> f64 {
    shared().lookup(z)
}

/// Builds the shared lookup table eagerly instead of on the first cached
/// evaluation. Idempotent; later calls return immediately.
pub fn init_sigmoid_lookup() {
    shared();
}

/// The process-wide table: built once, immutable and shared afterwards.
fn shared() -> &'static SigmoidTable {
    TABLE.get_or_init(|| {
        info!(
            entries = TABLE_SIZE,
            min = DOMAIN_MIN,
            max = DOMAIN_MAX;
            "sigmoid lookup table built"
        );
        SigmoidTable::build()
    })
}

/// Sigmoid samples over `[DOMAIN_MIN, DOMAIN_MAX)` at fixed steps, looked up
/// by nearest entry instead of evaluating `exp` per neuron.
struct SigmoidTable {
    values: [f64; TABLE_SIZE],
    interval: f64,
}

impl SigmoidTable {
    fn build() -> Self {
        let coef = (DOMAIN_MAX - DOMAIN_MIN) / TABLE_SIZE as f64;
        let mut values = [0.0; TABLE_SIZE];
        for (i, value) in values.iter_mut().enumerate() {
            *value = exact(DOMAIN_MIN + coef * i as f64);
        }

        Self {
            values,
            interval: TABLE_SIZE as f64 / (DOMAIN_MAX - DOMAIN_MIN),
        }
    }

    /// Nearest-entry lookup; arguments outside the domain clamp to the
    /// boundary entries.
    fn lookup(&self, z: f64) -> f64 {
        debug_assert!(!z.is_nan());

        if z < DOMAIN_MIN {
            return self.values[0];
        }
        if z >= DOMAIN_MAX {
            return self.values[TABLE_SIZE - 1];
        }

        let est = ((z - DOMAIN_MIN) * self.interval + 0.5) as usize;
        self.values[est.min(TABLE_SIZE - 1)]
    }
}
