extern crate ark_mem;

use std::cell::Cell;
use std::rc::Rc;
use ark_mem::alloc::{Global, Metered};
use ark_mem::buf::{BufError, DequeBuf, GrowthPolicy};

/// Counts its own drops.
struct Droppy {
    drops: Rc<Cell<usize>>,
}

impl Drop for Droppy {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_deque_buf_empty() {
    let meter = Metered::global();
    {
        let xs = DequeBuf::<usize, _>::with_heap(&meter);
        assert_eq!(xs.len(), 0);
        assert!(xs.is_empty());
        assert_eq!(xs.capacity(), 0);
        assert_eq!(xs.front(), Err(BufError::Empty));
        assert_eq!(xs.back(), Err(BufError::Empty));
        assert_eq!(meter.live(), 0);
    }
    assert_eq!(meter.allocs(), 0);
}

#[test]
fn test_deque_buf_push_back_growth() {
    let meter = Metered::global();
    {
        let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
        xs.push_back(5);
        assert_eq!(xs.capacity(), 1);
        assert_eq!(meter.live(), 1);
        assert_eq!(meter.used(), 8);

        xs.push_back(9);
        assert_eq!(xs.capacity(), 2);
        assert_eq!(meter.live(), 1);
        assert_eq!(meter.used(), 16);

        xs.push_back(13);
        assert_eq!(xs.capacity(), 4);
        xs.push_back(17);
        assert_eq!(xs.capacity(), 4);
        assert_eq!(meter.allocs(), 3);

        xs.push_back(21);
        assert_eq!(xs.capacity(), 8);
        for x in 0..4 {
            xs.push_back(x);
        }
        assert_eq!(xs.capacity(), 12);
        assert_eq!(xs.len(), 9);
        assert_eq!(meter.live(), 1);
        assert_eq!(meter.used(), 96);
        assert_eq!(xs.as_slice(), &[5, 9, 13, 17, 21, 0, 1, 2, 3]);
        assert_eq!(*xs.front().unwrap(), 5);
        assert_eq!(*xs.back().unwrap(), 3);
    }
    assert_eq!(meter.live(), 0);
    assert_eq!(meter.used(), 0);
}

#[test]
fn test_deque_buf_push_front_growth() {
    let meter = Metered::global();
    {
        let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
        xs.push_front(1);
        assert_eq!(xs.capacity(), 1);
        assert_eq!(xs.front_slack(), 0);
        xs.push_front(2);
        assert_eq!(xs.capacity(), 2);
        assert_eq!(xs.front_slack(), 0);
        xs.push_front(3);
        assert_eq!(xs.capacity(), 4);
        assert_eq!(xs.front_slack(), 1);
        assert_eq!(xs.back_slack(), 0);
        assert_eq!(xs.as_slice(), &[3, 2, 1]);
        assert_eq!(meter.allocs(), 3);
    }
    assert_eq!(meter.live(), 0);
}

#[test]
fn test_deque_buf_push_back_compacts_front_slack() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 1..=4 {
        xs.push_back(x);
    }
    assert_eq!(xs.pop_front(), Ok(1));
    assert_eq!(xs.pop_front(), Ok(2));
    assert_eq!(xs.front_slack(), 2);
    assert_eq!(xs.back_slack(), 0);

    xs.push_back(5);
    assert_eq!(xs.capacity(), 4);
    assert_eq!(xs.front_slack(), 0);
    assert_eq!(xs.back_slack(), 1);
    assert_eq!(xs.as_slice(), &[3, 4, 5]);
    assert_eq!(meter.allocs(), 3);
}

#[test]
fn test_deque_buf_push_front_compacts_back_slack() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 1..=4 {
        xs.push_back(x);
    }
    assert_eq!(xs.pop_back(), Ok(4));
    assert_eq!(xs.front_slack(), 0);
    assert_eq!(xs.back_slack(), 1);

    xs.push_front(0);
    assert_eq!(xs.capacity(), 4);
    assert_eq!(xs.front_slack(), 0);
    assert_eq!(xs.back_slack(), 0);
    assert_eq!(xs.as_slice(), &[0, 1, 2, 3]);
    assert_eq!(meter.allocs(), 3);
}

#[test]
fn test_deque_buf_min_compact_slack() {
    let meter = Metered::global();
    let policy = GrowthPolicy::default().with_min_compact_slack(2);
    let mut xs = DequeBuf::<usize, _>::with_heap_and_policy(&meter, policy);
    for x in 1..=4 {
        xs.push_back(x);
    }
    xs.pop_front().unwrap();
    // One slot of front slack is below the compaction threshold.
    xs.push_back(5);
    assert_eq!(xs.capacity(), 8);
    assert_eq!(xs.front_slack(), 0);
    assert_eq!(xs.as_slice(), &[2, 3, 4, 5]);
    assert_eq!(meter.allocs(), 4);
}

#[test]
fn test_deque_buf_queue_pattern_reuses_block() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 0..4 {
        xs.push_back(x);
    }
    let allocs = meter.allocs();
    for x in 4..1000 {
        assert_eq!(xs.pop_front(), Ok(x - 4));
        xs.push_back(x);
    }
    assert_eq!(xs.capacity(), 4);
    assert_eq!(meter.allocs(), allocs);
    assert_eq!(xs.as_slice(), &[996, 997, 998, 999]);
}

#[test]
fn test_deque_buf_fifo() {
    let mut xs = DequeBuf::<i64>::new();
    let mut next = 0;
    let mut expected = 0;
    for round in 0..50 {
        for _ in 0..(round % 7 + 1) {
            xs.push_back(next);
            next += 1;
        }
        for _ in 0..(round % 5) {
            if let Ok(x) = xs.pop_front() {
                assert_eq!(x, expected);
                expected += 1;
            }
        }
    }
    while let Ok(x) = xs.pop_front() {
        assert_eq!(x, expected);
        expected += 1;
    }
    assert_eq!(expected, next);
}

#[test]
fn test_deque_buf_lifo_at_either_end() {
    let mut xs = DequeBuf::<i32>::new();
    xs.push_back(1);
    xs.push_front(0);
    xs.push_back(2);
    xs.push_front(-1);
    assert_eq!(xs.as_slice(), &[-1, 0, 1, 2]);
    assert_eq!(xs.pop_back(), Ok(2));
    assert_eq!(xs.pop_front(), Ok(-1));
    assert_eq!(xs.pop_back(), Ok(1));
    assert_eq!(xs.pop_back(), Ok(0));
    assert_eq!(xs.pop_back(), Err(BufError::Empty));
    assert_eq!(xs.pop_front(), Err(BufError::Empty));
}

#[test]
fn test_deque_buf_unchecked_access() {
    let mut xs = DequeBuf::<i32>::new();
    xs.push_back(4);
    xs.push_back(8);
    unsafe {
        assert_eq!(*xs.front_unchecked(), 4);
        assert_eq!(*xs.back_unchecked(), 8);
        assert_eq!(xs.pop_back_unchecked(), 8);
        assert_eq!(xs.pop_front_unchecked(), 4);
    }
    assert!(xs.is_empty());
}

#[test]
fn test_deque_buf_front_back_mut() {
    let mut xs = DequeBuf::<i32>::new();
    assert_eq!(xs.front_mut(), Err(BufError::Empty));
    xs.push_back(1);
    xs.push_back(2);
    *xs.front_mut().unwrap() += 10;
    *xs.back_mut().unwrap() += 20;
    assert_eq!(xs.as_slice(), &[11, 22]);
    xs[0] = 3;
    assert_eq!(xs.get(0), Some(&3));
    assert_eq!(xs.get(2), None);
}

#[test]
fn test_deque_buf_emplace() {
    let mut xs = DequeBuf::<String>::new();
    xs.emplace_back(|| "b".repeat(2)).push('!');
    xs.emplace_front(|| String::from("a"));
    let x = xs.try_emplace_back(|| Ok::<_, ()>(String::from("c"))).unwrap();
    x.push('c');
    assert_eq!(xs.as_slice(), &["a", "bb!", "cc"]);
}

#[test]
fn test_deque_buf_push_clone() {
    let mut xs = DequeBuf::<String>::new();
    let s = String::from("x");
    xs.push_back_clone(&s);
    xs.push_front_clone(&s);
    assert_eq!(xs.len(), 2);
    assert_eq!(s, "x");
}

#[test]
fn test_deque_buf_reserve_back() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    xs.try_reserve_back(10).unwrap();
    assert_eq!(xs.capacity(), 10);
    assert_eq!(xs.back_slack(), 10);
    assert_eq!(meter.allocs(), 1);
    for x in 0..10 {
        xs.push_back(x);
    }
    assert_eq!(meter.allocs(), 1);
    assert_eq!(xs.capacity(), 10);

    xs.push_back(10);
    assert_eq!(meter.allocs(), 2);
    assert_eq!(xs.capacity(), 15);
}

#[test]
fn test_deque_buf_reserve_never_reallocates_insertions() {
    for n in 0..40 {
        let meter = Metered::global();
        let mut xs = DequeBuf::<u32, _>::with_heap(&meter);
        for x in 0..(n % 7) {
            xs.push_back(x);
        }
        if n % 3 == 0 {
            xs.pop_front().ok();
        }
        xs.reserve_back(n as usize);
        let allocs = meter.allocs();
        for x in 0..n {
            xs.push_back(x);
        }
        assert_eq!(meter.allocs(), allocs);
    }
}

#[test]
fn test_deque_buf_reserve_back_compacts() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 1..=4 {
        xs.push_back(x);
    }
    xs.pop_front().unwrap();
    xs.pop_front().unwrap();
    xs.reserve_back(2);
    assert_eq!(xs.capacity(), 4);
    assert_eq!(xs.back_slack(), 2);
    assert_eq!(xs.as_slice(), &[3, 4]);
    assert_eq!(meter.allocs(), 3);
}

#[test]
fn test_deque_buf_reserve_front() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    xs.push_back(1);
    xs.push_back(2);
    xs.reserve_front(3);
    assert_eq!(xs.capacity(), 5);
    assert_eq!(xs.front_slack(), 3);
    assert_eq!(xs.back_slack(), 0);
    let allocs = meter.allocs();
    for x in 0..3 {
        xs.push_front(x + 10);
    }
    assert_eq!(meter.allocs(), allocs);
    assert_eq!(xs.as_slice(), &[12, 11, 10, 1, 2]);
}

#[test]
fn test_deque_buf_shrink_to_fit_back() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 0..8 {
        xs.push_back(x);
    }
    xs.pop_front().unwrap();
    xs.pop_front().unwrap();
    xs.pop_back().unwrap();
    xs.pop_back().unwrap();
    assert_eq!(xs.front_slack(), 2);
    assert_eq!(xs.back_slack(), 2);
    assert_eq!(meter.used(), 64);

    xs.shrink_to_fit_back().unwrap();
    assert_eq!(xs.capacity(), xs.len());
    assert_eq!(xs.capacity(), 4);
    assert_eq!(xs.front_slack(), 0);
    assert_eq!(xs.back_slack(), 0);
    assert_eq!(meter.live(), 1);
    assert_eq!(meter.used(), 32);
    assert_eq!(xs.as_slice(), &[2, 3, 4, 5]);

    let allocs = meter.allocs();
    xs.shrink_to_fit_back().unwrap();
    xs.shrink_to_fit_front().unwrap();
    assert_eq!(meter.allocs(), allocs);
}

#[test]
fn test_deque_buf_shrink_to_fit_front() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 0..8 {
        xs.push_back(x);
    }
    xs.pop_front().unwrap();
    xs.pop_front().unwrap();
    xs.pop_back().unwrap();
    xs.shrink_to_fit_front().unwrap();
    assert_eq!(xs.capacity(), xs.len());
    assert_eq!(xs.capacity(), 5);
    assert_eq!(xs.front_slack(), 0);
    assert_eq!(xs.back_slack(), 0);
    assert_eq!(meter.used(), 40);
    assert_eq!(xs.as_slice(), &[2, 3, 4, 5, 6]);
}

#[test]
fn test_deque_buf_shrink_without_slack_on_side() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 0..5 {
        xs.push_back(x);
    }
    assert_eq!(xs.front_slack(), 0);
    let allocs = meter.allocs();
    xs.shrink_to_fit_front().unwrap();
    assert_eq!(xs.capacity(), 8);
    assert_eq!(meter.allocs(), allocs);
}

#[test]
fn test_deque_buf_shrink_empty_releases_block() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    xs.push_back(1);
    xs.pop_front().unwrap();
    assert_eq!(meter.live(), 1);
    xs.shrink_to_fit_front().unwrap();
    assert_eq!(xs.capacity(), 0);
    assert_eq!(meter.live(), 0);
    assert_eq!(meter.used(), 0);

    xs.push_back(2);
    assert_eq!(xs.as_slice(), &[2]);
}

#[test]
fn test_deque_buf_round_trip_releases_everything() {
    for k in 0..20 {
        let meter = Metered::global();
        {
            let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
            for x in 0..k {
                xs.push_back(x);
            }
            for x in 0..k {
                assert_eq!(xs.pop_front(), Ok(x));
            }
            assert_eq!(xs.len(), 0);
            assert_eq!(xs.front(), Err(BufError::Empty));
            xs.shrink_to_fit_front().unwrap();
            // Same storage as a fresh buffer.
            assert_eq!(xs.capacity(), 0);
            assert_eq!(meter.live(), 0);
            xs.push_back(k);
            assert_eq!(xs.as_slice(), &[k]);
        }
        assert_eq!(meter.live(), 0);
        assert_eq!(meter.used(), 0);
    }
}

#[test]
fn test_deque_buf_drops_each_element_once() {
    let drops = Rc::new(Cell::new(0));
    {
        let mut xs = DequeBuf::<Droppy>::new();
        for _ in 0..10 {
            xs.push_back(Droppy { drops: drops.clone() });
            xs.push_front(Droppy { drops: drops.clone() });
        }
        drop(xs.pop_front().unwrap());
        drop(xs.pop_back().unwrap());
        assert_eq!(drops.get(), 2);
        xs.truncate_back(15);
        assert_eq!(drops.get(), 5);
        assert_eq!(xs.len(), 15);
    }
    assert_eq!(drops.get(), 20);
}

#[test]
fn test_deque_buf_clear() {
    let drops = Rc::new(Cell::new(0));
    let meter = Metered::global();
    let mut xs = DequeBuf::<Droppy, _>::with_heap(&meter);
    for _ in 0..6 {
        xs.push_back(Droppy { drops: drops.clone() });
    }
    let cap = xs.capacity();
    xs.clear();
    assert_eq!(drops.get(), 6);
    assert!(xs.is_empty());
    assert_eq!(xs.capacity(), cap);
    assert_eq!(meter.live(), 1);
    drop(xs);
    assert_eq!(drops.get(), 6);
    assert_eq!(meter.live(), 0);
}

#[test]
fn test_deque_buf_into_iter() {
    let drops = Rc::new(Cell::new(0));
    let meter = Metered::global();
    {
        let mut xs = DequeBuf::<(usize, Droppy), _>::with_heap(&meter);
        for i in 0..6 {
            xs.push_back((i, Droppy { drops: drops.clone() }));
        }
        let mut iter = xs.into_iter();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next().map(|x| x.0), Some(0));
        assert_eq!(iter.next_back().map(|x| x.0), Some(5));
        assert_eq!(iter.len(), 4);
        assert_eq!(drops.get(), 2);
    }
    assert_eq!(drops.get(), 6);
    assert_eq!(meter.live(), 0);
}

#[test]
fn test_deque_buf_iter_and_collect() {
    let xs: DequeBuf<i32> = (0..5).collect();
    assert_eq!(xs.iter().sum::<i32>(), 10);
    let doubled: Vec<i32> = xs.iter().map(|x| x * 2).collect();
    assert_eq!(doubled, vec![0, 2, 4, 6, 8]);
    let mut ys = xs;
    for y in &mut ys {
        *y += 1;
    }
    assert_eq!(ys.into_iter().rev().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
}

#[test]
fn test_deque_buf_extend() {
    let mut xs = DequeBuf::<i32, Global>::default();
    xs.extend(vec![1, 2, 3]);
    xs.try_extend_back(4..6).unwrap();
    assert_eq!(xs.as_slice(), &[1, 2, 3, 4, 5]);
}

#[test]
fn test_deque_buf_repeated_extend_amortizes_growth() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 0..1000 {
        xs.extend(Some(x));
    }
    assert_eq!(xs.len(), 1000);
    assert_eq!(xs.capacity(), 1021);
    assert_eq!(meter.allocs(), 16);

    let meter = Metered::global();
    let mut ys = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 0..100 {
        ys.try_extend_back(vec![x, x, x]).unwrap();
    }
    assert_eq!(ys.len(), 300);
    assert!(meter.allocs() < 20);
    assert_eq!(meter.live(), 1);
}

#[test]
fn test_deque_buf_try_clone() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<usize, _>::with_heap(&meter);
    for x in 0..5 {
        xs.push_back(x);
    }
    let ys = xs.try_clone().unwrap();
    assert_eq!(ys.capacity(), 5);
    assert_eq!(ys.as_slice(), xs.as_slice());
    assert_eq!(meter.live(), 2);
    assert_eq!(meter.used(), 64 + 40);
    let zs = ys.clone();
    assert_eq!(zs.as_slice(), &[0, 1, 2, 3, 4]);
}

#[test]
fn test_deque_buf_swap() {
    let mut xs: DequeBuf<i32> = (0..3).collect();
    let mut ys: DequeBuf<i32> = (10..12).collect();
    xs.swap(&mut ys);
    assert_eq!(xs.as_slice(), &[10, 11]);
    assert_eq!(ys.as_slice(), &[0, 1, 2]);
}

#[test]
fn test_deque_buf_debug() {
    let xs: DequeBuf<i32> = (1..4).collect();
    assert_eq!(format!("{:?}", xs), "[1, 2, 3]");
}

#[test]
fn test_deque_buf_zero_sized() {
    let meter = Metered::global();
    let mut xs = DequeBuf::<(), _>::with_heap(&meter);
    assert_eq!(xs.capacity(), usize::MAX);
    for _ in 0..1000 {
        xs.push_back(());
        xs.push_front(());
    }
    assert_eq!(xs.len(), 2000);
    assert_eq!(xs.pop_front(), Ok(()));
    assert_eq!(xs.pop_back(), Ok(()));
    assert_eq!(xs.len(), 1998);
    xs.reserve_back(100);
    xs.shrink_to_fit_back().unwrap();
    assert_eq!(meter.allocs(), 0);
}
