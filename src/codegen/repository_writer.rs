//! Repository class emission

use super::naming::NamingResult;
use super::php_helpers::file_header;
use super::GeneratedNamespaces;

/// Render the repository class bound to the entity named by `naming`.
pub fn emit_repository(naming: &NamingResult, namespaces: &GeneratedNamespaces) -> String {
    let class_name = &naming.class_name;

    let mut code = file_header(&namespaces.repository);
    code.push_str(&format!("use {}\\{};\n", namespaces.entity, class_name));
    code.push_str("use Doctrine\\Bundle\\DoctrineBundle\\Repository\\ServiceEntityRepository;\n");
    code.push_str("use Doctrine\\Persistence\\ManagerRegistry;\n\n");
    code.push_str(&format!(
        "/**\n * @extends ServiceEntityRepository<{c}>\n */\nclass {c}Repository extends ServiceEntityRepository\n{{\n",
        c = class_name
    ));
    code.push_str("    public function __construct(ManagerRegistry $registry)\n");
    code.push_str("    {\n");
    code.push_str(&format!(
        "        parent::__construct($registry, {}::class);\n",
        class_name
    ));
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

/// File name of the repository for `class_name`.
pub fn repository_file_name(class_name: &str) -> String {
    format!("{}Repository.php", class_name)
}
