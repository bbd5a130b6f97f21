// License: MIT

#[cfg(test)]
use super::*;
#[cfg(test)]
use crate::tag::ElementType;

fn int_map(pairs: &[(&str, i32)]) -> Pmt {
    let map = Pmt::map();
    for (key, value) in pairs {
        map.insert(*key, Pmt::from(*value)).unwrap();
    }
    map
}

// ===== Map Access Tests =====

#[test]
fn test_map_iterates_in_ascending_key_order() {
    let map = int_map(&[("b", 1), ("a", 2)]);

    let keys: Vec<String> = map.as_map().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b"]);

    // Restartable: a second pass sees the same order.
    let again: Vec<String> = map.as_map().unwrap().iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(again, keys);
}

#[test]
fn test_map_order_is_byte_order() {
    let map = int_map(&[("b", 0), ("B", 0), ("aa", 0), ("a", 0), ("_", 0)]);
    let keys: Vec<String> = map.as_map().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["B", "_", "a", "aa", "b"]);
}

#[test]
fn test_at_missing_key_fails_without_side_effect() {
    let map = int_map(&[("present", 1)]);

    let result = map.at("absent");
    assert!(matches!(result, Err(PmtError::KeyNotFound { ref key, .. }) if key == "absent"));
    assert_eq!(map.as_map().unwrap().len(), 1);
    assert!(!map.as_map().unwrap().contains_key("absent"));
}

#[test]
fn test_entry_creates_retrievable_slot() {
    let mut map = MapValue::new();
    assert!(map.at("fresh").is_err());

    let slot = map.entry("fresh").expect("Failed to create slot");
    assert!(slot.is_null());

    let value = map.at("fresh").expect("Slot should exist after entry");
    assert_eq!(value.type_tag(), TypeTag::Null);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_entry_rebind_and_replace() {
    let mut map = MapValue::new();

    *map.entry("gain").unwrap() = Pmt::from(2.5f32);
    assert_eq!(map.at("gain").unwrap().get::<f32>().unwrap(), 2.5);

    // An existing slot is returned untouched.
    assert_eq!(map.entry("gain").unwrap().get::<f32>().unwrap(), 2.5);

    let handle = Pmt::from(map);
    let slot = handle.entry("label").unwrap();
    slot.replace(Value::from("rx")).unwrap();
    assert_eq!(handle.at("label").unwrap().get::<String>().unwrap(), "rx");
}

#[test]
fn test_insert_reports_replacement() {
    let mut map = MapValue::new();
    assert_eq!(map.insert("k", Pmt::from(1u8)), Ok(false));
    assert_eq!(map.insert("k", Pmt::from(2u8)), Ok(true));
    assert_eq!(map.at("k").unwrap().get::<u8>().unwrap(), 2);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_remove_and_size() {
    let mut map = MapValue::from_pairs([("x", Pmt::from(1i64)), ("y", Pmt::from(2i64))]).unwrap();
    assert_eq!(map.len(), 2);
    assert!(!map.is_empty());

    assert!(map.remove("x"));
    assert!(!map.remove("x"));
    assert_eq!(map.len(), 1);

    assert!(map.remove("y"));
    assert!(map.is_empty());
}

#[test]
fn test_empty_key_rejected() {
    let mut map = MapValue::new();
    assert!(matches!(map.insert("", Pmt::null()), Err(PmtError::InvalidKey { .. })));
    assert!(matches!(map.entry(""), Err(PmtError::InvalidKey { .. })));
    assert!(map.is_empty());
}

// ===== Print Tests =====

#[test]
fn test_print_empty_map() {
    assert_eq!(Pmt::map().to_string(), "{}");
    assert_eq!(MapValue::new().to_string(), "{}");
}

#[test]
fn test_print_single_entry_has_trailing_separator() {
    let map = int_map(&[("x", 1)]);
    assert_eq!(map.to_string(), "{x: 1, }");
}

#[test]
fn test_print_nested() {
    let inner = Pmt::map();
    inner.insert("c", Pmt::from(true)).unwrap();

    let list = Pmt::vector();
    list.push(Pmt::from(1u16)).unwrap();
    list.push(Pmt::from("hello")).unwrap();

    let root = Pmt::map();
    root.insert("b", inner).unwrap();
    root.insert("a", list).unwrap();
    root.insert("u", Pmt::from(vec![1i8, -2, 3])).unwrap();
    root.insert("z", Pmt::from(Complex::new(1.5f32, -0.5))).unwrap();

    let mut out = String::new();
    root.print(&mut out).unwrap();
    assert_eq!(out, "{a: [1, hello, ], b: {c: true, }, u: [1, -2, 3, ], z: (1.5,-0.5), }");
}

#[test]
fn test_print_empty_vectors_and_null() {
    assert_eq!(Pmt::vector().to_string(), "[]");
    assert_eq!(Pmt::from(Vec::<f64>::new()).to_string(), "[]");
    assert_eq!(Pmt::null().to_string(), "null");
}

// ===== Aliasing Tests =====

#[test]
fn test_alias_mutation_is_visible() {
    let m1 = Pmt::map();
    m1.insert("j", Pmt::map()).unwrap();

    let m2 = Pmt::map();
    m2.insert("k", m1.at("j").unwrap()).unwrap();

    m1.at("j").unwrap().insert("added", Pmt::from(7i32)).unwrap();

    let seen = m2.at("k").unwrap().at("added").expect("Alias should observe mutation");
    assert_eq!(seen.get::<i32>().unwrap(), 7);
    assert!(m1.at("j").unwrap().ptr_eq(&m2.at("k").unwrap()));
}

#[test]
fn test_deep_clone_breaks_aliasing() {
    let m1 = Pmt::map();
    m1.insert("j", int_map(&[("n", 1)])).unwrap();

    let m2 = Pmt::map();
    m2.insert("k", m1.at("j").unwrap().deep_clone()).unwrap();

    m1.at("j").unwrap().insert("added", Pmt::from(7i32)).unwrap();

    assert!(m2.at("k").unwrap().at("added").is_err());
    assert_eq!(m2.at("k").unwrap().at("n").unwrap().get::<i32>().unwrap(), 1);
    assert!(!m1.at("j").unwrap().ptr_eq(&m2.at("k").unwrap()));
}

#[test]
fn test_deep_clone_copies_whole_graph() {
    let shared = int_map(&[("v", 3)]);
    let list = Pmt::vector();
    list.push(shared.clone()).unwrap();
    list.push(shared.clone()).unwrap();
    list.push(Pmt::from(vec![true, false])).unwrap();

    let copy = list.deep_clone();
    assert_eq!(copy, list);

    let first = copy.item(0).unwrap();
    let second = copy.item(1).unwrap();
    assert!(!first.ptr_eq(&shared));
    assert!(!first.ptr_eq(&second));
}

#[test]
fn test_alias_count() {
    let leaf = Pmt::from(1u32);
    assert_eq!(leaf.alias_count(), 1);

    let map = Pmt::map();
    map.insert("a", leaf.clone()).unwrap();
    map.insert("b", leaf.clone()).unwrap();
    assert_eq!(leaf.alias_count(), 3);

    drop(map);
    assert_eq!(leaf.alias_count(), 1);
}

// ===== Equality Tests =====

#[test]
fn test_equality_ignores_aliasing() {
    let shared = Pmt::from(vec![1.0f64, 2.0]);
    let a = Pmt::map();
    a.insert("x", shared.clone()).unwrap();
    a.insert("y", shared).unwrap();

    let b = Pmt::map();
    b.insert("y", Pmt::from(vec![1.0f64, 2.0])).unwrap();
    b.insert("x", Pmt::from(vec![1.0f64, 2.0])).unwrap();

    assert!(a.equals(&b));
    assert_eq!(a, b);
}

#[test]
fn test_equality_differences() {
    assert_ne!(Pmt::from(1i32), Pmt::from(1i64));
    assert_ne!(Pmt::from(1i32), Pmt::from(vec![1i32]));
    assert_ne!(int_map(&[("a", 1)]), int_map(&[("b", 1)]));
    assert_ne!(int_map(&[("a", 1)]), int_map(&[("a", 2)]));
    assert_ne!(int_map(&[("a", 1)]), int_map(&[("a", 1), ("b", 1)]));
    assert_ne!(Pmt::map(), Pmt::vector());
    assert_eq!(Pmt::null(), Pmt::null());
}

#[test]
fn test_nan_is_not_equal_even_to_itself() {
    let nan = Pmt::from(f32::NAN);
    assert!(!nan.equals(&nan));

    let map = Pmt::map();
    map.insert("x", nan.clone()).unwrap();
    assert!(!map.equals(&map));
}

// ===== Cycle Tests =====

#[test]
fn test_direct_self_insert_rejected() {
    let map = Pmt::map();
    let err = map.insert("me", map.clone()).unwrap_err();
    assert!(matches!(err, PmtError::CycleDetected { .. }));
    assert!(map.as_map().unwrap().is_empty());
}

#[test]
fn test_transitive_cycle_rejected() {
    let outer = Pmt::map();
    let middle = Pmt::vector();
    let inner = Pmt::map();

    outer.insert("middle", middle.clone()).unwrap();
    middle.push(inner.clone()).unwrap();

    assert!(matches!(inner.insert("back", outer.clone()), Err(PmtError::CycleDetected { .. })));
    assert!(matches!(middle.set_item(0, outer.clone()), Err(PmtError::CycleDetected { .. })));

    let mut replacement = MapValue::new();
    replacement.insert("loop", outer.clone()).unwrap();
    assert!(matches!(inner.replace(Value::Map(replacement)), Err(PmtError::CycleDetected { .. })));

    // Sharing without a cycle is fine.
    let sibling = Pmt::map();
    sibling.insert("inner", inner.clone()).unwrap();
    outer.insert("sibling", sibling).unwrap();
    assert!(outer.reaches(&inner));
}

#[test]
fn test_cycle_check_visits_shared_values_once() {
    // Every level holds the level below twice, so there are 2^40 paths
    // from the top down to the bottom but only 41 distinct values.
    let bottom = Pmt::vector();
    let mut top = bottom.clone();
    for _ in 0..40 {
        let level = Pmt::vector();
        level.push(top.clone()).unwrap();
        level.push(top).unwrap();
        top = level;
    }

    let holder = Pmt::map();
    assert_eq!(holder.insert("diamond", top.clone()), Ok(false));
    assert!(holder.reaches(&bottom));

    assert!(matches!(bottom.push(top.clone()), Err(PmtError::CycleDetected { .. })));
    assert!(matches!(bottom.push(holder), Err(PmtError::CycleDetected { .. })));
}

// ===== Downcast Tests =====

#[test]
fn test_downcast_type_mismatch() {
    let scalar = Pmt::from(3u64);
    assert!(matches!(scalar.as_map(), Err(PmtError::TypeMismatch { found: TypeTag::Scalar(ElementType::U64), .. })));
    assert!(matches!(scalar.as_vector(), Err(PmtError::TypeMismatch { .. })));
    assert!(matches!(scalar.get::<u32>(), Err(PmtError::TypeMismatch { .. })));
    assert!(matches!(Pmt::map().as_scalar(), Err(PmtError::TypeMismatch { found: TypeTag::Map, .. })));
    assert!(matches!(Pmt::map().push(Pmt::null()), Err(PmtError::TypeMismatch { .. })));
    assert!(matches!(Pmt::vector().insert("k", Pmt::null()), Err(PmtError::TypeMismatch { .. })));

    // The variant is checked before any cycle search.
    assert!(matches!(scalar.insert("k", scalar.clone()), Err(PmtError::TypeMismatch { .. })));
    assert!(matches!(scalar.push(scalar.clone()), Err(PmtError::TypeMismatch { .. })));
    assert!(matches!(scalar.set_item(0, scalar.clone()), Err(PmtError::TypeMismatch { .. })));
}

#[test]
fn test_try_from_conversions() {
    let value = Pmt::from("hello");
    let s: Result<String, PmtError> = (&value).try_into();
    assert_eq!(s.unwrap(), "hello");

    let n: Result<i16, PmtError> = (&value).try_into();
    assert!(n.is_err());

    let samples = Pmt::from(vec![0.25f32, 0.5]);
    let back: Vec<f32> = Vec::try_from(&samples).unwrap();
    assert_eq!(back, vec![0.25, 0.5]);
    assert!(Vec::<f64>::try_from(&samples).is_err());
    assert!(Vec::<f32>::try_from(&Pmt::from(1.0f32)).is_err());

    let z = Complex::<f64>::try_from(&Pmt::from(Complex::new(0.0f64, 1.0))).unwrap();
    assert_eq!(z, Complex::new(0.0, 1.0));
}

// ===== Uniform Vector Tests =====

#[test]
fn test_uniform_vector_access() {
    let mut uniform = UniformVector::from_vec(vec![10u32, 20, 30]);
    assert_eq!(uniform.len(), 3);
    assert_eq!(uniform.type_tag(), TypeTag::UniformVector(ElementType::U32));

    assert_eq!(uniform.get(1).unwrap(), Scalar::U32(20));
    assert!(matches!(uniform.get(3), Err(PmtError::IndexOutOfRange { index: 3, length: 3, .. })));

    uniform.set(0, Scalar::U32(11)).unwrap();
    uniform.push(Scalar::U32(40)).unwrap();
    assert_eq!(uniform.as_slice::<u32>().unwrap(), &[11, 20, 30, 40]);

    assert!(matches!(uniform.set(9, Scalar::U32(0)), Err(PmtError::IndexOutOfRange { .. })));
    assert!(matches!(uniform.set(0, Scalar::I32(0)), Err(PmtError::TypeMismatch { .. })));
    assert!(matches!(uniform.push(Scalar::F32(0.0)), Err(PmtError::TypeMismatch { .. })));
    assert_eq!(uniform.len(), 4);
}

#[test]
fn test_uniform_vector_in_place_through_handle() {
    let samples = Pmt::from(Vec::<i16>::new());
    let alias = samples.clone();

    samples.as_uniform_vector_mut().unwrap().as_vec_mut::<i16>().unwrap().extend([1, 2, 3]);
    assert_eq!(alias.as_uniform_vector().unwrap().len(), 3);

    let scalars: Vec<Scalar> = alias.as_uniform_vector().unwrap().scalars().collect();
    assert_eq!(scalars, vec![Scalar::I16(1), Scalar::I16(2), Scalar::I16(3)]);
}

#[test]
fn test_uniform_vector_new_is_empty() {
    for element in ElementType::all() {
        let uniform = UniformVector::new(element);
        assert!(uniform.is_empty());
        assert_eq!(uniform.element_type(), element);
    }
}

// ===== Vector Tests =====

#[test]
fn test_vector_access() {
    let mut vector = VectorValue::new();
    vector.push(Pmt::from(1u8));
    vector.push(Pmt::from("two"));
    assert_eq!(vector.len(), 2);

    let old = vector.set(0, Pmt::from(false)).unwrap();
    assert_eq!(old.get::<u8>().unwrap(), 1);
    assert_eq!(vector.get(0).unwrap().get::<bool>().unwrap(), false);

    assert!(matches!(vector.get(2), Err(PmtError::IndexOutOfRange { index: 2, length: 2, .. })));
    assert!(matches!(vector.set(5, Pmt::null()), Err(PmtError::IndexOutOfRange { .. })));
}

#[test]
fn test_vector_of_maps() {
    let list: VectorValue = (0..3).map(|i| int_map(&[("i", i)])).collect();
    let handle = Pmt::from(list);
    assert_eq!(handle.to_string(), "[{i: 0, }, {i: 1, }, {i: 2, }, ]");
    assert_eq!(handle.item(2).unwrap().at("i").unwrap().get::<i32>().unwrap(), 2);
}

// ===== Depth Tests =====

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 10_000;
    let mut root = Pmt::from(0u8);
    for _ in 0..depth {
        root = Pmt::from(MapValue::from_pairs([("n", root)]).unwrap());
    }

    let printed = root.to_string();
    assert!(printed.starts_with("{n: {n: "));
    assert_eq!(printed.matches('{').count(), depth);

    let copy = root.deep_clone();
    assert_eq!(copy, root);

    drop(copy);
    drop(root);
}
