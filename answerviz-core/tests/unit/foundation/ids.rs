use super::*;

#[test]
fn counter_ids_are_sequential() {
    let mut ids = CounterIds::new("ans");
    assert_eq!(ids.next_id(), "ans_1");
    assert_eq!(ids.next_id(), "ans_2");

    let mut ids = CounterIds::starting_at("vis", 40);
    assert_eq!(ids.next_id(), "vis_40");
}

#[test]
fn closures_are_id_sources() {
    let mut n = 0;
    let mut src = || {
        n += 1;
        format!("x{n}")
    };
    assert_eq!(src.next_id(), "x1");
    assert_eq!(src.next_id(), "x2");
}
