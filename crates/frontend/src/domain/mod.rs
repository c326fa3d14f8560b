pub mod b001_project;
pub mod b002_employee;
pub mod b003_work_report;
pub mod b004_nomenclature;
pub mod b005_payment;
pub mod b006_assignment;
