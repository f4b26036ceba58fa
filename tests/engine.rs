use std::time::Duration;
use yurupet::mess::RandomSource;
use yurupet::model::{ActionKind, Button, Face, Moment, Need, Rules, Stats};
use yurupet::sim::GameState;

/// Returns the same sample forever: 0.0 always spawns, 0.99 never does.
struct Always(f64);

impl RandomSource for Always {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn pet_with(t0: &Moment, hunger: i32, fun: i32, clean: i32, sample: f64) -> GameState<Always> {
    let mut stats = Stats::new(80, t0);
    stats.clamp_and_set(Need::Hunger, hunger);
    stats.clamp_and_set(Need::Fun, fun);
    stats.clamp_and_set(Need::Clean, clean);
    GameState::with_stats(Rules::default(), stats, Always(sample))
}

/// Press a button and tick through the three step intervals. Returns the completion moment.
fn run_sequence(pet: &mut GameState<Always>, button: Button, t0: Moment, step: u64) -> Moment {
    pet.press_button(button, &t0);
    let mut t = t0;
    for _ in 0..3 {
        t = t.after(ms(step));
        pet.tick(&t);
    }
    t
}

#[test]
fn hungry_pet_eats_and_perks_up() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 30, 80, 80, 0.99);

    let done = run_sequence(&mut pet, Button::Feed, t0, 350);

    assert_eq!(pet.stats().hunger(), 55);
    assert_eq!(pet.stats().clean(), 77);
    assert_eq!(pet.face(), Face::Happy);
    assert_eq!(pet.activity().kind(), None);
    assert_eq!(pet.sequencer().feed_cooldown_until(), Some(done.mono + ms(1200)));

    // the next decay keeps it out of the hungry face
    pet.tick(&t0.after(Duration::from_secs(6)));
    assert_eq!(pet.stats().hunger(), 53);
    assert_ne!(pet.face(), Face::Hungry);
}

#[test]
fn feed_reward_lands_only_on_completion() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 40, 80, 50, 0.99);
    pet.press_button(Button::Feed, &t0);
    pet.tick(&t0.after(ms(350)));
    pet.tick(&t0.after(ms(700)));
    assert_eq!(pet.stats().hunger(), 40);
    assert_eq!(pet.activity().kind(), Some(ActionKind::Feed));
    pet.tick(&t0.after(ms(1050)));
    assert_eq!(pet.stats().hunger(), 65);
    assert_eq!(pet.stats().clean(), 47);
}

#[test]
fn feeding_full_pet_clamps() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 90, 80, 2, 0.99);
    run_sequence(&mut pet, Button::Feed, t0, 350);
    assert_eq!(pet.stats().hunger(), 100);
    assert_eq!(pet.stats().clean(), 0);
}

#[test]
fn feed_is_refused_for_the_whole_cooldown() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 50, 80, 80, 0.99);
    let done = run_sequence(&mut pet, Button::Feed, t0, 350);
    pet.drain_notices();

    for i in 0..20 {
        let t = done.after(ms(i * 55));
        pet.press_button(Button::Feed, &t);
        assert_eq!(pet.activity().kind(), None, "attempt {i}");
    }
    let notices = pet.drain_notices();
    assert_eq!(notices.len(), 20);
    assert!(notices.iter().all(|n| n.text == "Hold on..."));
    assert_eq!(pet.stats().hunger(), 75);

    pet.press_button(Button::Feed, &done.after(ms(1200)));
    assert_eq!(pet.activity().kind(), Some(ActionKind::Feed));
}

#[test]
fn play_adds_a_quarter_and_caps_at_full() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 80, 40, 80, 0.99);
    let t = run_sequence(&mut pet, Button::Play, t0, 400);
    assert_eq!(pet.stats().fun(), 65);

    run_sequence(&mut pet, Button::Play, t, 400);
    assert_eq!(pet.stats().fun(), 90);
    let t = t.after(ms(1200));
    run_sequence(&mut pet, Button::Play, t, 400);
    assert_eq!(pet.stats().fun(), 100);
}

#[test]
fn input_is_ignored_while_a_sequence_runs() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 50, 50, 50, 0.0);
    // plant a mess first
    pet.tick(&t0.after(Duration::from_secs(6)));
    assert_eq!(pet.messes().len(), 1);
    let id = pet.messes().ids()[0];
    let before = *pet.stats();

    let t1 = t0.after(Duration::from_secs(7));
    pet.press_button(Button::Play, &t1);
    pet.drain_notices();
    pet.press_button(Button::Feed, &t1);
    pet.press_button(Button::Clean, &t1);
    pet.click_mess(id);

    assert_eq!(pet.activity().kind(), Some(ActionKind::Play));
    assert_eq!(*pet.stats(), before);
    assert_eq!(pet.messes().len(), 1);
    assert!(pet.drain_notices().is_empty());
}

#[test]
fn decay_applies_once_however_long_the_gap() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 80, 80, 80, 0.99);
    let later = t0.after(Duration::from_secs(3600));

    pet.tick(&later);
    assert_eq!(pet.stats().hunger(), 78);
    assert_eq!(pet.stats().fun(), 79);
    assert_eq!(pet.stats().clean(), 79);
    assert!((pet.stats().lifetime_secs - 3600.0).abs() < 1e-3);
    assert!(pet.take_dirty());

    // nothing more until another interval passes
    pet.tick(&later.after(ms(4900)));
    assert_eq!(pet.stats().hunger(), 78);
    assert!(!pet.take_dirty());

    pet.tick(&later.after(ms(5100)));
    assert_eq!(pet.stats().hunger(), 76);
}

#[test]
fn clock_running_backwards_does_not_decay() {
    let t0 = Moment::now();
    let pet = pet_with(&t0, 80, 80, 80, 0.99);
    let mut stats = pet.snapshot();
    stats.last_decay_at += 10_000.0;
    let mut pet = GameState::with_stats(Rules::default(), stats, Always(0.99));
    pet.tick(&t0.after(Duration::from_secs(30)));
    assert_eq!(pet.stats().hunger(), 80);
    assert_eq!(pet.stats().lifetime_secs, 0.0);
}

#[test]
fn faces_follow_needs_after_decay() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 36, 80, 80, 0.99);
    pet.tick(&t0.after(Duration::from_secs(6)));
    assert_eq!(pet.face(), Face::Hungry);

    let mut pet = pet_with(&t0, 80, 35, 80, 0.99);
    pet.tick(&t0.after(Duration::from_secs(6)));
    assert_eq!(pet.face(), Face::Sleepy);

    let mut pet = pet_with(&t0, 80, 80, 80, 0.0);
    pet.tick(&t0.after(Duration::from_secs(6)));
    assert_eq!(pet.messes().len(), 1);
    assert_eq!(pet.face(), Face::Sleepy);
}

#[test]
fn dirty_pet_saturates_at_three_messes() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 80, 80, 10, 0.0);
    let mut t = t0;
    for _ in 0..5 {
        t = t.after(Duration::from_secs(6));
        pet.tick(&t);
    }
    assert_eq!(pet.messes().len(), 3);
    assert_eq!(pet.stats().clean(), 5);

    for _ in 0..5 {
        t = t.after(Duration::from_secs(6));
        pet.tick(&t);
    }
    assert_eq!(pet.messes().len(), 3);
}

#[test]
fn clicking_a_mess_tidies_it() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 80, 80, 50, 0.0);
    let t1 = t0.after(Duration::from_secs(6));
    pet.tick(&t1);
    let clean = pet.stats().clean();
    let id = pet.messes().ids()[0];
    pet.take_dirty();
    pet.drain_notices();

    pet.click_mess(id);
    assert!(pet.messes().is_empty());
    assert_eq!(pet.stats().clean(), clean + 5);
    assert!(pet.take_dirty());
    assert_eq!(pet.drain_notices()[0].text, "Cleaned up");

    // second click on the same id does nothing
    pet.click_mess(id);
    assert_eq!(pet.stats().clean(), clean + 5);
    assert!(!pet.take_dirty());
}

#[test]
fn bulk_clean_pays_per_mess_plus_bonus() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 80, 80, 30, 0.0);
    let mut t = t0;
    for _ in 0..3 {
        t = t.after(Duration::from_secs(6));
        pet.tick(&t);
    }
    assert_eq!(pet.messes().len(), 3);
    assert_eq!(pet.stats().clean(), 27);

    pet.press_button(Button::Clean, &t);
    assert!(pet.messes().is_empty());
    assert_eq!(pet.stats().clean(), 27 + 15 + 20);
    assert_eq!(pet.face(), Face::Happy);
    let last = pet.drain_notices().pop().unwrap();
    assert_eq!(last.text, "Sparkling clean!");
}

#[test]
fn bulk_clean_without_messes_still_scrubs() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 80, 80, 95, 0.99);
    pet.press_button(Button::Clean, &t0);
    assert_eq!(pet.stats().clean(), 100);
}

#[test]
fn view_reports_the_bob_while_busy() {
    let t0 = Moment::now();
    let mut pet = pet_with(&t0, 80, 80, 80, 0.99);
    pet.press_button(Button::Play, &t0);
    let v = pet.view();
    assert!(v.busy);
    assert_eq!(v.prop, Some(ActionKind::Play));
    assert_eq!(v.offset, 0);

    pet.tick(&t0.after(ms(400)));
    assert_eq!(pet.view().offset, -6);
    pet.tick(&t0.after(ms(800)));
    assert_eq!(pet.view().offset, 6);
    pet.tick(&t0.after(ms(1200)));
    let v = pet.view();
    assert!(!v.busy);
    assert_eq!(v.prop, None);
    assert_eq!(v.offset, 0);
    assert_eq!(v.fun, 100);
}
