#![no_main]
use libfuzzer_sys::fuzz_target;

use avl_family::model::{run_btree_equivalence, Op};

fuzz_target!(|ops: Vec<Op>| { run_btree_equivalence(ops) });
