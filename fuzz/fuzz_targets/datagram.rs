#![no_main]

use std::time::{Duration, Instant};

use codec::{decode_datagram, BuilderRegistry, DecoderConfig, FragmentCache};
use libfuzzer_sys::fuzz_target;
use protocol16::{ParameterError, ParameterTable};

fn first_parameter(table: &ParameterTable) -> Result<i64, ParameterError> {
    table.integral(0)
}

fuzz_target!(|data: &[u8]| {
    let mut builder = BuilderRegistry::builder();
    let _ = builder.register_event(1, first_parameter);
    let _ = builder.register_request(1, first_parameter);
    let registry = builder.build();
    let config = DecoderConfig::for_testing();
    let mut cache = FragmentCache::new(config.limits.clone(), config.eviction);

    // Split the input into datagrams so fragments can span them.
    let start = Instant::now();
    let mut idx = 0usize;
    let mut step = 0u64;
    while idx < data.len() && idx < 8192 {
        let len = usize::from(data[idx]) * 4 + 1;
        idx += 1;
        let end = (idx + len).min(data.len());
        let now = start + Duration::from_millis(step * 500);
        let _ = decode_datagram(&data[idx..end], &mut cache, &registry, &config, now);
        assert!(cache.pending_count() <= config.eviction.max_pending);
        idx = end;
        step += 1;
    }
});
