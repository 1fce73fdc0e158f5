//! The COMPANY sample catalog and the queries the binary reports on.
//!
//! Each plan is what a SQL front-end would hand the analyzer for the query
//! text shown next to it.

use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;
use tributary_common::{MemoryCatalog, Result};
use tributary_plan::{
    binary, col, column_index, lit, lit_str, AggregateCall, JoinType, PlanBuilder, PlanNode,
    SortKey,
};

pub struct DemoQuery {
    pub name: &'static str,
    pub sql: &'static str,
    pub plan: PlanNode,
    pub output_schema: Schema,
}

pub fn company_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    catalog.register_table(
        "EMPLOYEES",
        Arc::new(Schema::new(vec![
            Field::new("EMPLOYEE_ID", DataType::Int32, false),
            Field::new("FIRST_NAME", DataType::Utf8, true),
            Field::new("LAST_NAME", DataType::Utf8, true),
            Field::new("EMAIL", DataType::Utf8, true),
            Field::new("DEPARTMENT_ID", DataType::Int32, true),
            Field::new("SALARY", DataType::Decimal128(10, 2), true),
            Field::new("HIRE_DATE", DataType::Date32, true),
        ])),
    );
    catalog.register_table(
        "DEPARTMENTS",
        Arc::new(Schema::new(vec![
            Field::new("DEPARTMENT_ID", DataType::Int32, false),
            Field::new("DEPARTMENT_NAME", DataType::Utf8, true),
            Field::new("LOCATION", DataType::Utf8, true),
            Field::new("MANAGER_ID", DataType::Int32, true),
        ])),
    );
    catalog
}

pub fn demo_queries(catalog: &MemoryCatalog) -> Result<Vec<DemoQuery>> {
    Ok(vec![
        simple_scan(catalog)?,
        join(catalog)?,
        group_by(catalog)?,
        computed(catalog)?,
        top_salaries(catalog)?,
    ])
}

fn field(name: &str, data_type: DataType, nullable: bool) -> Field {
    Field::new(name, data_type, nullable)
}

fn simple_scan(catalog: &MemoryCatalog) -> Result<DemoQuery> {
    let plan = PlanBuilder::scan(catalog, "EMPLOYEES")?
        .project(vec![
            col(column_index(catalog, "EMPLOYEES", "EMPLOYEE_ID")?),
            col(column_index(catalog, "EMPLOYEES", "FIRST_NAME")?),
            col(column_index(catalog, "EMPLOYEES", "LAST_NAME")?),
        ])?
        .build();
    Ok(DemoQuery {
        name: "simple",
        sql: "SELECT EMPLOYEE_ID, FIRST_NAME, LAST_NAME FROM EMPLOYEES",
        plan,
        output_schema: Schema::new(vec![
            field("EMPLOYEE_ID", DataType::Int32, false),
            field("FIRST_NAME", DataType::Utf8, true),
            field("LAST_NAME", DataType::Utf8, true),
        ]),
    })
}

fn join(catalog: &MemoryCatalog) -> Result<DemoQuery> {
    let offset = catalog.table("EMPLOYEES")?.fields().len();
    let dept = |column: &str| column_index(catalog, "DEPARTMENTS", column).map(|i| i + offset);
    let condition = binary(
        col(column_index(catalog, "EMPLOYEES", "DEPARTMENT_ID")?),
        "=",
        col(dept("DEPARTMENT_ID")?),
    );
    let plan = PlanBuilder::scan(catalog, "EMPLOYEES")?
        .join(PlanBuilder::scan(catalog, "DEPARTMENTS")?.build(), JoinType::Inner, Some(condition))?
        .project(vec![
            col(column_index(catalog, "EMPLOYEES", "FIRST_NAME")?),
            col(column_index(catalog, "EMPLOYEES", "LAST_NAME")?),
            col(dept("DEPARTMENT_NAME")?),
        ])?
        .build();
    Ok(DemoQuery {
        name: "join",
        sql: "SELECT E.FIRST_NAME, E.LAST_NAME, D.DEPARTMENT_NAME \
              FROM EMPLOYEES E JOIN DEPARTMENTS D ON E.DEPARTMENT_ID = D.DEPARTMENT_ID",
        plan,
        output_schema: Schema::new(vec![
            field("FIRST_NAME", DataType::Utf8, true),
            field("LAST_NAME", DataType::Utf8, true),
            field("DEPARTMENT_NAME", DataType::Utf8, true),
        ]),
    })
}

fn group_by(catalog: &MemoryCatalog) -> Result<DemoQuery> {
    // Trim to the grouped and aggregated columns first: $0 = DEPARTMENT_ID, $1 = SALARY.
    let plan = PlanBuilder::scan(catalog, "EMPLOYEES")?
        .project(vec![
            col(column_index(catalog, "EMPLOYEES", "DEPARTMENT_ID")?),
            col(column_index(catalog, "EMPLOYEES", "SALARY")?),
        ])?
        .aggregate(
            vec![0],
            vec![AggregateCall::new("COUNT", vec![]), AggregateCall::new("AVG", vec![1])],
        )?
        .build();
    Ok(DemoQuery {
        name: "group-by",
        sql: "SELECT DEPARTMENT_ID, COUNT(*) as EMP_COUNT, AVG(SALARY) as AVG_SALARY \
              FROM EMPLOYEES GROUP BY DEPARTMENT_ID",
        plan,
        output_schema: Schema::new(vec![
            field("DEPARTMENT_ID", DataType::Int32, true),
            field("EMP_COUNT", DataType::Int64, false),
            field("AVG_SALARY", DataType::Decimal128(10, 2), true),
        ]),
    })
}

fn computed(catalog: &MemoryCatalog) -> Result<DemoQuery> {
    let first_name = col(column_index(catalog, "EMPLOYEES", "FIRST_NAME")?);
    let last_name = col(column_index(catalog, "EMPLOYEES", "LAST_NAME")?);
    let salary = col(column_index(catalog, "EMPLOYEES", "SALARY")?);
    let department = col(column_index(catalog, "EMPLOYEES", "DEPARTMENT_ID")?);

    let plan = PlanBuilder::scan(catalog, "EMPLOYEES")?
        .filter(binary(department, "=", lit("10")))?
        .project(vec![
            binary(binary(first_name, "||", lit_str(" ")), "||", last_name),
            binary(salary, "*", lit("1.1")),
        ])?
        .build();
    Ok(DemoQuery {
        name: "computed",
        sql: "SELECT FIRST_NAME || ' ' || LAST_NAME as FULL_NAME, SALARY * 1.1 as NEW_SALARY \
              FROM EMPLOYEES WHERE DEPARTMENT_ID = 10",
        plan,
        output_schema: Schema::new(vec![
            field("FULL_NAME", DataType::Utf8, true),
            field("NEW_SALARY", DataType::Decimal128(12, 3), true),
        ]),
    })
}

fn top_salaries(catalog: &MemoryCatalog) -> Result<DemoQuery> {
    let plan = PlanBuilder::scan(catalog, "EMPLOYEES")?
        .project(vec![
            col(column_index(catalog, "EMPLOYEES", "LAST_NAME")?),
            col(column_index(catalog, "EMPLOYEES", "SALARY")?),
        ])?
        .sort(vec![SortKey::desc(1)])?
        .limit(0, Some(5))
        .build();
    Ok(DemoQuery {
        name: "top-salaries",
        sql: "SELECT LAST_NAME, SALARY FROM EMPLOYEES ORDER BY SALARY DESC LIMIT 5",
        plan,
        output_schema: Schema::new(vec![
            field("LAST_NAME", DataType::Utf8, true),
            field("SALARY", DataType::Decimal128(10, 2), true),
        ]),
    })
}
