//! A small student database wired through a `Registry`.

use crate::journal::Journal;
use crate::stubs::{StubExecutorSource, Tables};
use kite_binding::{MapperInterface, MapperOutput, MethodDecl, ReturnKind};
use kite_core::{record, SqlCommandType, Value};
use kite_registry::{Registry, RegistryBuilder, RegistryResult, RegistrySessionFactory};
use kite_session::SessionManager;
use std::sync::Arc;

/// Namespace of the student mapper.
pub const STUDENT_MAPPER: &str = "school.StudentMapper";

/// Number of students in the seeded tables.
pub const STUDENTS: i64 = 25;

/// The student mapper interface.
pub fn student_mapper() -> MapperInterface {
    MapperInterface::new(STUDENT_MAPPER)
        .method(MethodDecl::new("selectById", ReturnKind::One).param("id"))
        .method(MethodDecl::new("selectWithPage", ReturnKind::Many).param("page"))
        .method(MethodDecl::new("selectAll", ReturnKind::Many))
        .method(MethodDecl::new(
            "byName",
            ReturnKind::Map {
                key: "name".to_string(),
            },
        ))
        .method(MethodDecl::new("insert", ReturnKind::Count))
        .method(MethodDecl::new("rename", ReturnKind::Flag).param("id").param("name"))
        .method(MethodDecl::new("remove", ReturnKind::Void))
        .method(MethodDecl::new("flush", ReturnKind::Batch))
        .method(
            MethodDecl::new("countAll", ReturnKind::Count).default_body(|mapper, _| {
                let rows = mapper.invoke("selectAll", Vec::new())?.into_many()?;
                Ok(MapperOutput::Count(rows.len()))
            }),
        )
}

/// Declare the student statements and mapper on `builder`.
pub fn student_registry(builder: &mut RegistryBuilder) -> RegistryResult<()> {
    let statements = [
        ("selectById", SqlCommandType::Select, "select * from student where id = #{id}"),
        ("selectWithPage", SqlCommandType::Select, "select * from student order by id"),
        ("selectAll", SqlCommandType::Select, "select * from student"),
        ("byName", SqlCommandType::Select, "select * from student"),
        ("insert", SqlCommandType::Insert, "insert into student (name) values (#{name})"),
        ("rename", SqlCommandType::Update, "update student set name = #{name} where id = #{id}"),
        ("remove", SqlCommandType::Delete, "delete from student where id = #{id}"),
        ("flush", SqlCommandType::Flush, ""),
    ];
    for (method, command, sql) in statements {
        builder
            .add_statement(format!("{STUDENT_MAPPER}.{method}"), command)
            .sql(sql)
            .done()?;
    }
    builder.add_mapper(student_mapper());
    Ok(())
}

/// Seed `tables` with the student rows.
pub fn seed_students(tables: &Tables) {
    let students: Vec<Value> = (1..=STUDENTS)
        .map(|id| record! { "id" => id, "name" => format!("student-{id}") })
        .collect();
    tables.insert(
        &format!("{STUDENT_MAPPER}.selectById"),
        students[..1].to_vec(),
    );
    for method in ["selectWithPage", "selectAll", "byName"] {
        tables.insert(&format!("{STUDENT_MAPPER}.{method}"), students.clone());
    }
}

/// Registry, executor source and session factory over the student tables.
pub struct Fixture {
    pub journal: Journal,
    pub tables: Tables,
    pub source: StubExecutorSource,
    pub registry: Arc<Registry>,
    pub factory: Arc<RegistrySessionFactory>,
}

impl Fixture {
    /// Build the fixture; `configure` may add interceptors or settings.
    pub fn new(configure: impl FnOnce(&mut RegistryBuilder)) -> RegistryResult<Self> {
        let mut builder = RegistryBuilder::new();
        student_registry(&mut builder)?;
        configure(&mut builder);
        let registry = Arc::new(builder.build()?);

        let journal = Journal::new();
        let tables = Tables::new();
        seed_students(&tables);
        let source = StubExecutorSource::new(&journal, &tables);
        let factory = Arc::new(RegistrySessionFactory::new(
            Arc::clone(&registry),
            Arc::new(source.clone()),
        ));
        Ok(Self {
            journal,
            tables,
            source,
            registry,
            factory,
        })
    }

    /// A session manager over the fixture's factory.
    pub fn manager(&self) -> Arc<SessionManager> {
        Arc::new(self.registry.session_manager(self.factory.clone()))
    }
}
