#![no_main]
use archivist::{
    load_object_from_slice, save_object, Json, MismatchedTypesPolicy, OverflowNumberPolicy,
    SerializationOptions, Timestamp,
};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

type Series = BTreeMap<String, Vec<Option<i32>>>;

fuzz_target!(|data: &[u8]| {
    let options = SerializationOptions::new()
        .with_overflow_number_policy(OverflowNumberPolicy::Skip)
        .with_mismatched_types_policy(MismatchedTypesPolicy::Skip);

    let mut series = Series::new();
    if load_object_from_slice::<Json, _>(&mut series, data, options).is_ok() {
        let text = save_object::<Json, _>(&mut series).unwrap();
        let mut again = Series::new();
        load_object_from_slice::<Json, _>(&mut again, text.as_bytes(), options).unwrap();
        assert_eq!(again, series);
    }

    let mut times: Vec<Timestamp> = Vec::new();
    let _ = load_object_from_slice::<Json, _>(&mut times, data, options);
});
