mod act_fn;
mod sigmoid;

pub use act_fn::ActFn;
pub use sigmoid::init_sigmoid_lookup;
