use tideline::Migration;

#[derive(Default)]
pub struct Version20240301000000;

impl Migration for Version20240301000000 {
    fn up(&self) -> Vec<String> {
        vec!["CREATE TABLE invoices (id SERIAL PRIMARY KEY)".to_string()]
    }
}

pub mod billing {
    use tideline::Migration;

    #[derive(Default)]
    pub struct Version20240302000000;

    impl Migration for Version20240302000000 {
        fn up(&self) -> Vec<String> {
            vec!["CREATE TABLE payments (id SERIAL PRIMARY KEY)".to_string()]
        }
    }
}
