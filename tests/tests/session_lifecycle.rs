//! Managed and auto-managed session lifecycle tests.

use kite_tests::prelude::*;

fn setup() -> (Journal, Tables, SessionManager) {
    let journal = Journal::new();
    let tables = Tables::new();
    seed_students(&tables);
    let manager = SessionManager::new(Arc::new(StubFactory::new(&journal, &tables)));
    (journal, tables, manager)
}

fn select_by_id() -> String {
    format!("{STUDENT_MAPPER}.selectById")
}

mod unmanaged {
    use super::*;

    #[test]
    fn test_two_reads_run_two_independent_cycles() {
        // GIVEN no managed session
        let (journal, _tables, manager) = setup();

        // WHEN reading twice
        manager.select_one(&select_by_id(), Value::Int(1)).unwrap();
        manager.select_one(&select_by_id(), Value::Int(1)).unwrap();

        // THEN each read opened, committed and closed its own session
        journal
            .expect()
            .opened(2)
            .committed(2)
            .rolled_back(0)
            .closed(2)
            .verify()
            .unwrap();
        assert_eq!(journal.calling_sessions(), vec![1, 2]);
        assert_eq!(
            journal.events(),
            vec![
                Event::Opened { session: 1 },
                Event::Called {
                    session: 1,
                    operation: "select_one",
                    statement: select_by_id(),
                },
                Event::Committed {
                    session: 1,
                    force: false
                },
                Event::Closed { session: 1 },
                Event::Opened { session: 2 },
                Event::Called {
                    session: 2,
                    operation: "select_one",
                    statement: select_by_id(),
                },
                Event::Committed {
                    session: 2,
                    force: false
                },
                Event::Closed { session: 2 },
            ]
        );
    }

    #[test]
    fn test_failure_rolls_back_once_closes_once_and_keeps_error() {
        // GIVEN a statement that fails in the execution layer
        let (journal, tables, manager) = setup();
        let failure = PersistenceError::database("duplicate key value violates unique constraint");
        tables.fail("school.StudentMapper.insert", failure.clone());

        // WHEN inserting without a managed session
        let err = manager
            .insert("school.StudentMapper.insert", record! { "name" => "Ada" })
            .unwrap_err();

        // THEN the original error comes back after one rollback and one close
        assert_eq!(err, failure);
        journal
            .expect()
            .opened(1)
            .committed(0)
            .rolled_back(1)
            .closed(1)
            .verify()
            .unwrap();
    }

    #[test]
    fn test_close_failure_after_call_failure_keeps_first_error() {
        let (journal, tables, _) = setup();
        let factory = StubFactory::new(&journal, &tables);
        factory.fail_closes();
        let manager = SessionManager::new(Arc::new(factory));
        tables.fail(
            "school.StudentMapper.remove",
            PersistenceError::database("lock timeout"),
        );

        let err = manager
            .delete("school.StudentMapper.remove", Value::Int(1))
            .unwrap_err();

        assert_eq!(err, PersistenceError::database("lock timeout"));
        journal.expect().rolled_back(1).closed(1).verify().unwrap();
    }

    #[test]
    fn test_too_many_results_triggers_rollback() {
        let (journal, _tables, manager) = setup();

        let err = manager
            .select_one("school.StudentMapper.selectAll", Value::Null)
            .unwrap_err();

        assert_eq!(
            err,
            PersistenceError::too_many_results("school.StudentMapper.selectAll", STUDENTS as usize)
        );
        journal.expect().committed(0).rolled_back(1).closed(1).verify().unwrap();
    }
}

mod managed {
    use super::*;

    #[test]
    fn test_start_two_reads_close() {
        // GIVEN a started managed session
        let (journal, _tables, manager) = setup();
        manager.start().unwrap();
        assert!(manager.is_managed_session_started());

        // WHEN reading twice then closing
        manager.select_one(&select_by_id(), Value::Int(1)).unwrap();
        manager
            .select_list(
                "school.StudentMapper.selectAll",
                Value::Null,
                RowBounds::new(0, 5),
            )
            .unwrap();
        manager.close().unwrap();

        // THEN one session served both reads and nothing auto-committed
        journal
            .expect()
            .opened(1)
            .committed(0)
            .closed(1)
            .verify()
            .unwrap();
        assert_eq!(journal.calling_sessions(), vec![1, 1]);
        assert!(!manager.is_managed_session_started());

        // AND the next read is a fresh one-shot cycle
        journal.clear();
        manager.select_one(&select_by_id(), Value::Int(1)).unwrap();
        journal
            .expect()
            .opened(1)
            .committed(1)
            .closed(1)
            .verify()
            .unwrap();
        assert_eq!(journal.calling_sessions(), vec![2]);
    }

    #[test]
    fn test_commit_with_empty_slot_is_usage_error() {
        let (journal, _tables, manager) = setup();

        let err = manager.commit(true).unwrap_err();

        assert!(err.is_usage());
        assert_eq!(journal.events(), vec![]);
    }

    #[test]
    fn test_explicit_transaction_demarcation() {
        let (journal, _tables, manager) = setup();
        manager.start().unwrap();

        manager
            .insert("school.StudentMapper.insert", record! { "name" => "Ada" })
            .unwrap();
        manager
            .update("school.StudentMapper.rename", record! { "id" => 1i64, "name" => "Grace" })
            .unwrap();
        manager.commit(false).unwrap();
        manager.flush_statements().unwrap();
        manager.clear_cache().unwrap();
        assert_eq!(manager.connection().unwrap().id(), 1);
        manager.close().unwrap();

        journal
            .expect()
            .opened(1)
            .committed(1)
            .rolled_back(0)
            .closed(1)
            .verify()
            .unwrap();
        assert!(journal.events().contains(&Event::Flushed { session: 1 }));
        assert!(journal.events().contains(&Event::CacheCleared { session: 1 }));
    }

    #[test]
    fn test_managed_failure_is_not_rolled_back_automatically() {
        let (journal, tables, manager) = setup();
        tables.fail("school.StudentMapper.insert", PersistenceError::database("boom"));
        manager.start().unwrap();

        let err = manager
            .insert("school.StudentMapper.insert", Value::Null)
            .unwrap_err();
        manager.rollback(true).unwrap();
        manager.close().unwrap();

        assert_eq!(err, PersistenceError::database("boom"));
        assert_eq!(
            journal.events().last(),
            Some(&Event::Closed { session: 1 })
        );
        journal.expect().rolled_back(1).verify().unwrap();
    }

    #[test]
    fn test_close_clears_slot_when_delegate_close_fails() {
        let (journal, tables, _) = setup();
        let factory = StubFactory::new(&journal, &tables);
        factory.fail_closes();
        let manager = SessionManager::new(Arc::new(factory));
        manager.start().unwrap();

        assert!(manager.close().is_err());

        assert!(!manager.is_managed_session_started());
    }

    #[test]
    fn test_threads_have_independent_slots() {
        // GIVEN one manager shared by several threads
        let (journal, _tables, manager) = setup();

        // WHEN each thread runs its own managed session
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    manager.start().unwrap();
                    manager.select_one(&select_by_id(), Value::Int(1)).unwrap();
                    manager.select_one(&select_by_id(), Value::Int(1)).unwrap();
                    manager.close().unwrap();
                    assert!(!manager.is_managed_session_started());
                });
            }
        });

        // THEN every thread used exactly one session of its own
        journal.expect().opened(4).committed(0).closed(4).verify().unwrap();
        let mut sessions = journal.calling_sessions();
        sessions.sort_unstable();
        sessions.dedup();
        assert_eq!(sessions.len(), 4);
    }
}

mod explicit_context {
    use super::*;

    #[test]
    fn test_open_session_is_independent_of_slot() {
        let (journal, _tables, manager) = setup();

        let session = manager.open_session(&SessionOptions::default()).unwrap();
        session.select_one(&select_by_id(), Value::Int(1)).unwrap();
        session.commit(false).unwrap();
        session.close().unwrap();

        assert!(!manager.is_managed_session_started());
        journal.expect().opened(1).committed(1).closed(1).verify().unwrap();
    }

    #[test]
    fn test_reject_policy_requires_context() {
        let (journal, _tables, manager) = setup();
        let manager = manager.with_unmanaged_policy(UnmanagedPolicy::Reject);

        let err = manager.select_one(&select_by_id(), Value::Int(1)).unwrap_err();

        assert!(err.is_usage());
        assert_eq!(journal.opened(), 0);
    }
}
