#![no_main]
use libfuzzer_sys::fuzz_target;
use std::collections::VecDeque;
use tabula::stream::RingBuffer;

// Drives a ring buffer with arbitrary operations and checks it against a
// VecDeque.
fuzz_target!(|data: &[u8]| {
    let mut ring = RingBuffer::new(16);
    let mut model = VecDeque::new();

    for &byte in data {
        match byte % 3 {
            0 if !ring.is_full() => {
                ring.push_back(byte);
                model.push_back(byte);
            }
            1 if !ring.is_full() => {
                ring.push_front(byte);
                model.push_front(byte);
            }
            2 if !ring.is_empty() => {
                assert_eq!(Some(ring.pop_front()), model.pop_front());
            }
            _ => {}
        }
        assert_eq!(ring.len(), model.len());
        assert!(ring.get(ring.len()).is_none());
    }
    assert!(ring.iter().eq(model.iter()));
});
