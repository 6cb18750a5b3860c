// App layer: presentation of assessments for the command line.

pub mod report;
