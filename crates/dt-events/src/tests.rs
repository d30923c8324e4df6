//! Unit tests for dt-events.

#[cfg(test)]
mod helpers {
    use dt_core::{AgentId, NodeId, SimTime, TransportMode};
    use crate::{Event, EventHandler};

    pub fn departure(t: u32, agent: u32) -> Event {
        Event::Departure {
            time:  SimTime(t),
            agent: AgentId(agent),
            node:  NodeId(0),
            mode:  TransportMode::Car,
        }
    }

    /// Records every event time it sees, plus resets.
    #[derive(Default)]
    pub struct Recorder {
        pub times:  Vec<u32>,
        pub resets: Vec<u32>,
    }

    impl EventHandler for Recorder {
        fn handle(&mut self, event: &Event) {
            self.times.push(event.time().seconds());
        }

        fn reset(&mut self, iteration: u32) {
            self.times.clear();
            self.resets.push(iteration);
        }
    }
}

#[cfg(test)]
mod event {
    use dt_core::{AgentId, NodeId, SimTime};
    use crate::Event;

    #[test]
    fn accessors_and_display() {
        let e = super::helpers::departure(3_600, 7);
        assert_eq!(e.agent(), AgentId(7));
        assert_eq!(e.node(), NodeId(0));
        assert_eq!(e.kind(), "departure");
        assert_eq!(e.to_string(), "01:00:00 departure agent#7 at node#0 (car)");

        let stuck = Event::Stuck { time: SimTime(5), agent: AgentId(1), node: NodeId(2), mode: None };
        assert_eq!(stuck.detail(), "");
        assert_eq!(stuck.to_string(), "00:00:05 stuck agent#1 at node#2");
    }
}

#[cfg(test)]
mod manager {
    use std::sync::{Arc, Mutex};

    use crate::EventsManager;

    use super::helpers::{departure, Recorder};

    #[test]
    fn events_are_buffered_until_flush() {
        let rec = Arc::new(Mutex::new(Recorder::default()));
        let mut em = EventsManager::new();
        em.add_handler(rec.clone());

        em.process_event(departure(10, 0));
        em.process_event(departure(5, 1));
        assert_eq!(em.pending().len(), 2);
        assert!(rec.lock().unwrap().times.is_empty());

        assert_eq!(em.flush(), 2);
        assert!(em.pending().is_empty());
        // Emission order, not time order.
        assert_eq!(rec.lock().unwrap().times, vec![10, 5]);
        assert_eq!(em.delivered(), 2);
    }

    #[test]
    fn every_handler_sees_every_event() {
        let a = Arc::new(Mutex::new(Recorder::default()));
        let b = Arc::new(Mutex::new(Recorder::default()));
        let mut em = EventsManager::new();
        em.add_handler(a.clone());
        em.add_handler(b.clone());
        em.process_event(departure(1, 0));
        em.flush();
        assert_eq!(a.lock().unwrap().times, vec![1]);
        assert_eq!(b.lock().unwrap().times, vec![1]);
    }

    #[test]
    fn removed_handler_gets_nothing() {
        let rec = Arc::new(Mutex::new(Recorder::default()));
        let mut em = EventsManager::new();
        let id = em.add_handler(rec.clone());
        assert!(em.remove_handler(id).is_some());
        assert!(em.remove_handler(id).is_none());
        em.process_event(departure(1, 0));
        em.flush();
        assert!(rec.lock().unwrap().times.is_empty());
        assert_eq!(em.handler_count(), 0);
    }

    #[test]
    fn reset_clears_buffer_and_handlers() {
        let rec = Arc::new(Mutex::new(Recorder::default()));
        let mut em = EventsManager::new();
        em.add_handler(rec.clone());
        em.process_event(departure(1, 0));
        em.flush();
        em.process_event(departure(2, 0));

        em.reset(4);
        assert_eq!(em.iteration(), 4);
        assert!(em.pending().is_empty());
        assert_eq!(em.delivered(), 0);
        let r = rec.lock().unwrap();
        assert!(r.times.is_empty());
        assert_eq!(r.resets, vec![4]);
    }
}
